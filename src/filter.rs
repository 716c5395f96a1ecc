//! Time-range filtering over measurement history

use crate::models::{MeasurementRecord, TimeRange};
use chrono::NaiveDate;

/// Sort records ascending by date.
///
/// The sort is stable, so records sharing a date keep their submission order.
pub fn sort_by_date(records: &mut [MeasurementRecord]) {
    records.sort_by_key(|r| r.date);
}

/// Keep the records dated on or after `range.cutoff(today)`, in input order.
pub fn filter_by_range(
    records: &[MeasurementRecord],
    range: TimeRange,
    today: NaiveDate,
) -> Vec<MeasurementRecord> {
    let cutoff = range.cutoff(today);
    let filtered: Vec<MeasurementRecord> = records
        .iter()
        .filter(|r| r.date >= cutoff)
        .cloned()
        .collect();

    tracing::debug!(
        range = %range,
        %cutoff,
        total = records.len(),
        kept = filtered.len(),
        "Filtered measurements by time range"
    );

    filtered
}

/// [`filter_by_range`] anchored on the local calendar date
pub fn filter_by_range_now(
    records: &[MeasurementRecord],
    range: TimeRange,
) -> Vec<MeasurementRecord> {
    filter_by_range(records, range, chrono::Local::now().date_naive())
}
