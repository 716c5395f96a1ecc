//! Chart series projection
//!
//! Turns filtered measurement records into chart-ready points, either for a
//! single metric or for all metrics at once.

use crate::models::{ChartPoint, MeasurementRecord, Metric, MultiMetricPoint};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Result of projecting one metric.
///
/// Empty and single-point windows are presentation states, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "points", rename_all = "snake_case")]
pub enum SeriesOutcome {
    /// No record in the window has the metric
    Empty,
    /// Exactly one record has the metric; not enough for a trend line
    SinglePoint(ChartPoint),
    /// Two or more points
    Trend(Vec<ChartPoint>),
}

impl SeriesOutcome {
    fn from_points(mut points: Vec<ChartPoint>) -> Self {
        match points.len() {
            0 => SeriesOutcome::Empty,
            1 => SeriesOutcome::SinglePoint(points.remove(0)),
            _ => SeriesOutcome::Trend(points),
        }
    }

    /// Points regardless of state
    pub fn points(&self) -> &[ChartPoint] {
        match self {
            SeriesOutcome::Empty => &[],
            SeriesOutcome::SinglePoint(point) => std::slice::from_ref(point),
            SeriesOutcome::Trend(points) => points,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SeriesOutcome::Empty)
    }

    pub fn has_trend(&self) -> bool {
        matches!(self, SeriesOutcome::Trend(_))
    }

    /// Message for states that cannot draw a trend line
    pub fn status_message(&self, metric: Metric) -> Option<String> {
        match self {
            SeriesOutcome::Empty => Some(format!(
                "No {} measurements in this period",
                metric.label().to_lowercase()
            )),
            SeriesOutcome::SinglePoint(_) => Some(format!(
                "Only one {} measurement in this period; add more to see a trend",
                metric.label().to_lowercase()
            )),
            SeriesOutcome::Trend(_) => None,
        }
    }
}

/// Axis label in `M/D` form
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// Project a single metric, skipping records where it was not measured
pub fn project_metric(records: &[MeasurementRecord], metric: Metric) -> SeriesOutcome {
    let points: Vec<ChartPoint> = records
        .iter()
        .filter_map(|record| {
            record.value(metric).map(|value| ChartPoint {
                display_date: format_display_date(record.date),
                original_date: record.date,
                value,
            })
        })
        .collect();

    tracing::debug!(
        metric = ?metric,
        records = records.len(),
        points = points.len(),
        "Projected single-metric series"
    );

    SeriesOutcome::from_points(points)
}

/// Project every record with all five metrics; absent values stay `None`
pub fn project_all(records: &[MeasurementRecord]) -> Vec<MultiMetricPoint> {
    records
        .iter()
        .map(|record| MultiMetricPoint {
            display_date: format_display_date(record.date),
            original_date: record.date,
            body_weight: record.body_weight,
            waist_size: record.waist_size,
            chest_size: record.chest_size,
            biceps_size: record.biceps_size,
            thigh_size: record.thigh_size,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_display_date_format() {
        assert_eq!(format_display_date(date(1, 5)), "1/5");
        assert_eq!(format_display_date(date(11, 23)), "11/23");
    }

    #[test]
    fn test_single_metric_skips_absent_values() {
        let records = vec![
            MeasurementRecord::new(date(1, 1)).with(Metric::BodyWeight, dec!(80)),
            MeasurementRecord::new(date(1, 8)).with(Metric::WaistSize, dec!(86)),
            MeasurementRecord::new(date(1, 15)).with(Metric::BodyWeight, dec!(79.2)),
        ];

        let outcome = project_metric(&records, Metric::BodyWeight);

        assert!(outcome.has_trend());
        let points = outcome.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].display_date, "1/1");
        assert_eq!(points[1].original_date, date(1, 15));
        assert_eq!(points[1].value, dec!(79.2));
    }

    #[test]
    fn test_single_metric_empty_state() {
        let records = vec![MeasurementRecord::new(date(1, 1)).with(Metric::BodyWeight, dec!(80))];

        let outcome = project_metric(&records, Metric::ThighSize);
        assert_eq!(outcome, SeriesOutcome::Empty);
        assert!(outcome.points().is_empty());
        assert!(outcome.status_message(Metric::ThighSize).unwrap().contains("No thigh"));

        assert!(project_metric(&[], Metric::BodyWeight).is_empty());
    }

    #[test]
    fn test_single_metric_single_point_state() {
        let records = vec![
            MeasurementRecord::new(date(2, 1)).with(Metric::ChestSize, dec!(100)),
            MeasurementRecord::new(date(2, 2)).with(Metric::BodyWeight, dec!(80)),
        ];

        let outcome = project_metric(&records, Metric::ChestSize);
        match &outcome {
            SeriesOutcome::SinglePoint(point) => {
                assert_eq!(point.value, dec!(100));
                assert_eq!(point.original_date, date(2, 1));
            }
            other => panic!("expected single point, got {:?}", other),
        }
        assert_ne!(outcome, SeriesOutcome::Empty);
        assert!(outcome.status_message(Metric::ChestSize).unwrap().contains("Only one"));
    }

    #[test]
    fn test_original_date_recovers_source_record() {
        let records = vec![
            MeasurementRecord::new(date(3, 1)).with(Metric::BicepsSize, dec!(35)),
            MeasurementRecord::new(date(3, 2)),
            MeasurementRecord::new(date(3, 9)).with(Metric::BicepsSize, dec!(35.5)),
        ];

        let outcome = project_metric(&records, Metric::BicepsSize);
        for point in outcome.points() {
            let source = records
                .iter()
                .find(|r| r.date == point.original_date)
                .unwrap();
            assert_eq!(source.value(Metric::BicepsSize), Some(point.value));
        }
    }

    #[test]
    fn test_all_metrics_preserves_nulls() {
        let records = vec![
            MeasurementRecord::new(date(4, 1))
                .with(Metric::BodyWeight, dec!(80))
                .with(Metric::WaistSize, dec!(86)),
            MeasurementRecord::new(date(4, 8)).with(Metric::ThighSize, dec!(58)),
        ];

        let points = project_all(&records);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].body_weight, Some(dec!(80)));
        assert_eq!(points[0].thigh_size, None);
        assert_eq!(points[1].body_weight, None);
        assert_eq!(points[1].value(Metric::ThighSize), Some(dec!(58)));

        let json = serde_json::to_string(&points[1]).unwrap();
        assert!(json.contains("\"body_weight\":null"));
    }

    #[test]
    fn test_all_metrics_empty_input() {
        assert!(project_all(&[]).is_empty());
    }

    #[test]
    fn test_outcome_serialization_tags_status() {
        let json = serde_json::to_string(&SeriesOutcome::Empty).unwrap();
        assert_eq!(json, "{\"status\":\"empty\"}");
    }
}
