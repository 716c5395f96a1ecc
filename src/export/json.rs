use crate::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export any serializable data structure to pretty JSON
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<(), ExportError>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let json_data = serde_json::to_string_pretty(data)
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MeasurementRecord, Metric};
    use crate::series::project_all;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_all_metric_points() {
        let records = vec![MeasurementRecord::new(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap())
            .with(Metric::BodyWeight, dec!(80.2))];
        let points = project_all(&records);

        let temp_file = NamedTempFile::new().unwrap();
        export_json(&points, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"display_date\": \"9/1\""));
        assert!(content.contains("\"original_date\": \"2024-09-01\""));
        assert!(content.contains("\"body_weight\": \"80.2\""));
        assert!(content.contains("\"waist_size\": null"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let result = export_json(&vec![1, 2, 3], "/nonexistent/dir/out.json");
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
