use crate::error::{ExportError, Result};
use crate::models::{Metric, MultiMetricPoint, ProgressSummary, TimeRange};
use crate::series::SeriesOutcome;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod csv;
pub mod json;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Chart data carried by a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChartData {
    /// One metric with its empty/single-point/trend state
    Single {
        metric: Metric,
        series: SeriesOutcome,
    },
    /// Every metric per record, absent values as null
    All { points: Vec<MultiMetricPoint> },
}

/// Progress report for one subject and window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub subject_id: Option<String>,
    pub range: TimeRange,
    pub as_of: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub summary: ProgressSummary,
    pub chart: ChartData,
}

/// Write a report in the requested format.
///
/// JSON carries the whole report; CSV carries the chart rows only.
pub fn export_report<P: AsRef<Path>>(
    report: &ProgressReport,
    format: ExportFormat,
    output_path: P,
) -> Result<()> {
    let output_path = output_path.as_ref();
    tracing::info!(
        format = ?format,
        path = %output_path.display(),
        "Exporting progress report"
    );

    match format {
        ExportFormat::Json => json::export_json(report, output_path)?,
        ExportFormat::Csv => match &report.chart {
            ChartData::Single { metric, series } => {
                csv::export_series(series.points(), *metric, output_path)?
            }
            ChartData::All { points } => csv::export_all_metrics(points, output_path)?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BodyRsError;
    use crate::models::{MeasurementRecord, Units};
    use crate::{series, stats};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn sample_report(chart: ChartData) -> ProgressReport {
        let records = vec![
            MeasurementRecord::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
                .with(Metric::BodyWeight, dec!(80)),
            MeasurementRecord::new(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())
                .with(Metric::BodyWeight, dec!(76)),
        ];

        ProgressReport {
            subject_id: Some("client-1".to_string()),
            range: TimeRange::OneMonth,
            as_of: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            generated_at: Utc::now(),
            summary: stats::progress_summary(&records, Units::Metric),
            chart: match chart {
                ChartData::Single { metric, .. } => ChartData::Single {
                    metric,
                    series: series::project_metric(&records, metric),
                },
                ChartData::All { .. } => ChartData::All {
                    points: series::project_all(&records),
                },
            },
        }
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_report_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = sample_report(ChartData::Single {
            metric: Metric::BodyWeight,
            series: SeriesOutcome::Empty,
        });

        export_report(&report, ExportFormat::Json, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"subject_id\": \"client-1\""));
        assert!(content.contains("\"range\": \"1m\""));
        assert!(content.contains("\"mode\": \"single\""));
        assert!(content.contains("\"status\": \"trend\""));
    }

    #[test]
    fn test_export_report_csv_all_metrics() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let report = sample_report(ChartData::All { points: Vec::new() });

        export_report(&report, ExportFormat::Csv, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,display_date,body_weight"));
    }

    #[test]
    fn test_export_report_unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let report = sample_report(ChartData::All { points: Vec::new() });

        let err = export_report(&report, ExportFormat::Json, &path).unwrap_err();
        assert!(matches!(err, BodyRsError::Export(ExportError::Io(_))));
    }
}
