use chrono::{DateTime, NaiveDate};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

use crate::error::ImportError;
use crate::models::{MeasurementRecord, Metric};

/// Standard column names after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Date,
    Subject,
    Notes,
    Measurement(Metric),
}

/// CSV parser for measurement exports with flexible column mapping
pub struct MeasurementCsvParser {
    column_mapping: HashMap<String, Column>,
}

impl MeasurementCsvParser {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        Self::add_mapping(
            &mut column_mapping,
            Column::Date,
            &["date", "measured_on", "measurement_date", "created_at"],
        );
        Self::add_mapping(
            &mut column_mapping,
            Column::Subject,
            &["subject_id", "client_id", "user_id", "subject"],
        );
        Self::add_mapping(&mut column_mapping, Column::Notes, &["notes", "note", "comment"]);
        Self::add_mapping(
            &mut column_mapping,
            Column::Measurement(Metric::BodyWeight),
            &["body_weight", "weight", "bodyweight"],
        );
        Self::add_mapping(
            &mut column_mapping,
            Column::Measurement(Metric::WaistSize),
            &["waist_size", "waist"],
        );
        Self::add_mapping(
            &mut column_mapping,
            Column::Measurement(Metric::ChestSize),
            &["chest_size", "chest"],
        );
        Self::add_mapping(
            &mut column_mapping,
            Column::Measurement(Metric::BicepsSize),
            &["biceps_size", "biceps", "bicep"],
        );
        Self::add_mapping(
            &mut column_mapping,
            Column::Measurement(Metric::ThighSize),
            &["thigh_size", "thigh", "thighs"],
        );

        Self { column_mapping }
    }

    fn add_mapping(mapping: &mut HashMap<String, Column>, standard: Column, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard);
        }
    }

    fn normalize_column_name(&self, name: &str) -> Option<Column> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        self.column_mapping.get(&normalized).copied()
    }

    fn parse_date(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Some(date);
            }
        }

        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.date_naive())
    }

    /// Parse every data row from a CSV reader.
    ///
    /// Rows with an unreadable date are skipped. Malformed numeric cells are
    /// treated as not measured so they never show up as zeros on a chart.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<MeasurementRecord>, ImportError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let header_mapping: HashMap<usize, Column> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, header)| self.normalize_column_name(header).map(|c| (i, c)))
            .collect();

        if !header_mapping.values().any(|c| *c == Column::Date) {
            return Err(ImportError::MissingColumn {
                column: "date".to_string(),
            });
        }

        let mut records = Vec::new();

        for result in reader.records() {
            let row = result.map_err(|err| ImportError::ParseError {
                line: err.position().map(|p| p.line()).unwrap_or(0),
                reason: err.to_string(),
            })?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            let mut date = None;
            let mut record_fields: Vec<(Metric, Decimal)> = Vec::new();
            let mut subject_id = None;
            let mut notes = None;

            for (i, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }

                match header_mapping.get(&i) {
                    Some(Column::Date) => date = Self::parse_date(value),
                    Some(Column::Subject) => subject_id = Some(value.to_string()),
                    Some(Column::Notes) => notes = Some(value.to_string()),
                    Some(Column::Measurement(metric)) => match Decimal::from_str(value) {
                        Ok(parsed) => record_fields.push((*metric, parsed)),
                        Err(_) => {
                            tracing::warn!(line, metric = ?metric, value, "Ignoring malformed measurement value");
                        }
                    },
                    None => {}
                }
            }

            let Some(date) = date else {
                tracing::warn!(line, "Skipping measurement row without a valid date");
                continue;
            };

            let mut record = MeasurementRecord::new(date);
            for (metric, value) in record_fields {
                record = record.with(metric, value);
            }
            record.subject_id = subject_id;
            record.notes = notes;
            records.push(record);
        }

        tracing::debug!(count = records.len(), "Parsed measurement CSV");
        Ok(records)
    }

    pub fn parse_str(&self, content: &str) -> Result<Vec<MeasurementRecord>, ImportError> {
        self.parse_reader(content.as_bytes())
    }
}

impl Default for MeasurementCsvParser {
    fn default() -> Self {
        Self::new()
    }
}
