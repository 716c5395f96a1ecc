use crate::error::ExportError;
use crate::models::{ChartPoint, Metric, MultiMetricPoint};
use rust_decimal::Decimal;
use std::path::Path;

fn cell(value: Option<Decimal>) -> String {
    value.map_or(String::new(), |v| v.to_string())
}

fn csv_error(err: ::csv::Error) -> ExportError {
    ExportError::SerializationError(err.to_string())
}

/// Export one metric's chart points
pub fn export_series<P: AsRef<Path>>(
    points: &[ChartPoint],
    metric: Metric,
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_path(output_path).map_err(csv_error)?;

    writer
        .write_record(["date", "display_date", metric.key()])
        .map_err(csv_error)?;

    for point in points {
        writer
            .write_record([
                point.original_date.format("%Y-%m-%d").to_string(),
                point.display_date.clone(),
                point.value.to_string(),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

/// Export all-metric points; unmeasured values are empty cells
pub fn export_all_metrics<P: AsRef<Path>>(
    points: &[MultiMetricPoint],
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_path(output_path).map_err(csv_error)?;

    writer
        .write_record([
            "date",
            "display_date",
            "body_weight",
            "waist_size",
            "chest_size",
            "biceps_size",
            "thigh_size",
        ])
        .map_err(csv_error)?;

    for point in points {
        writer
            .write_record([
                point.original_date.format("%Y-%m-%d").to_string(),
                point.display_date.clone(),
                cell(point.body_weight),
                cell(point.waist_size),
                cell(point.chest_size),
                cell(point.biceps_size),
                cell(point.thigh_size),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementRecord;
    use crate::series::{project_all, project_metric};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::NamedTempFile;

    fn records() -> Vec<MeasurementRecord> {
        vec![
            MeasurementRecord::new(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap())
                .with(Metric::BodyWeight, dec!(80))
                .with(Metric::WaistSize, dec!(86)),
            MeasurementRecord::new(NaiveDate::from_ymd_opt(2024, 9, 15).unwrap())
                .with(Metric::WaistSize, dec!(85)),
        ]
    }

    #[test]
    fn test_export_series() {
        let outcome = project_metric(&records(), Metric::WaistSize);
        let temp_file = NamedTempFile::new().unwrap();

        export_series(outcome.points(), Metric::WaistSize, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "date,display_date,waist_size");
        assert_eq!(lines[1], "2024-09-01,9/1,86");
        assert_eq!(lines[2], "2024-09-15,9/15,85");
    }

    #[test]
    fn test_export_all_metrics_leaves_gaps_empty() {
        let points = project_all(&records());
        let temp_file = NamedTempFile::new().unwrap();

        export_all_metrics(&points, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2024-09-01,9/1,80,86,,,");
        assert_eq!(lines[2], "2024-09-15,9/15,,85,,,");
    }

    #[test]
    fn test_export_empty_series_writes_header() {
        let temp_file = NamedTempFile::new().unwrap();
        export_series(&[], Metric::BodyWeight, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content.trim(), "date,display_date,body_weight");
    }
}
