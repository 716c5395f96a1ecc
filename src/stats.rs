//! Derived progress statistics
//!
//! Deltas between the extremes of a window plus two heuristic estimates:
//! body fat from the waist/chest ratio and muscle gain from weight and
//! body-fat movement. The heuristics are coarse approximations kept for
//! dashboard display; they are not a physiological model.

use crate::models::{DerivedStat, MeasurementRecord, Metric, ProgressSummary, Units};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Lower bound of the body-fat estimate (percent)
pub const BODY_FAT_MIN: Decimal = dec!(5);
/// Upper bound of the body-fat estimate (percent)
pub const BODY_FAT_MAX: Decimal = dec!(35);
/// Body-fat drop (points) needed before a weight loss counts as recomposition
pub const RECOMP_FAT_DROP: Decimal = dec!(2);
/// Share of the body-fat drop credited as muscle during a weight loss
pub const RECOMP_MUSCLE_FACTOR: Decimal = dec!(0.3);

fn round1(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a form-style numeric input; anything unparseable becomes zero
pub fn parse_metric_input(input: &str) -> Decimal {
    let trimmed = input.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Change between the first and last records that carry `metric`.
///
/// `value` is the magnitude and `change` the signed difference, saturating
/// at the decimal range. Fewer than two measurements yields a zero stat.
pub fn simple_delta(records: &[MeasurementRecord], metric: Metric, units: Units) -> DerivedStat {
    let mut values = records.iter().filter_map(|r| r.value(metric));
    let first = values.next();
    let last = values.last();

    match (first, last) {
        (Some(first), Some(last)) => {
            let change = last.saturating_sub(first);
            DerivedStat::new(change.abs(), change, metric.unit(units))
        }
        _ => DerivedStat::zero(metric.unit(units)),
    }
}

/// Body-fat percentage from waist and chest circumference.
///
/// `clamp(waist / chest * 100 - 30, 5, 35)` rounded to one decimal. A zero
/// result means the inputs were missing, non-positive or out of range; it is
/// never a real estimate.
pub fn body_fat_estimate(waist: Option<Decimal>, chest: Option<Decimal>) -> Decimal {
    let (waist, chest) = match (waist, chest) {
        (Some(w), Some(c)) if w > Decimal::ZERO && c > Decimal::ZERO => (w, c),
        _ => return Decimal::ZERO,
    };

    let raw = waist
        .checked_div(chest)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .and_then(|percent| percent.checked_sub(dec!(30)));

    match raw {
        Some(raw) => round1(raw.clamp(BODY_FAT_MIN, BODY_FAT_MAX)),
        None => {
            tracing::debug!(%waist, %chest, "Body-fat estimate overflowed");
            Decimal::ZERO
        }
    }
}

fn record_body_fat(record: &MeasurementRecord) -> Decimal {
    body_fat_estimate(record.waist_size, record.chest_size)
}

/// Body-fat estimate at the end of the window and its change since the start
pub fn body_fat_stat(records: &[MeasurementRecord]) -> DerivedStat {
    let estimates: Vec<Decimal> = records
        .iter()
        .map(record_body_fat)
        .filter(|bf| !bf.is_zero())
        .collect();

    match (estimates.first(), estimates.last()) {
        (Some(first), Some(last)) => DerivedStat::new(*last, *last - *first, "%"),
        _ => DerivedStat::zero("%"),
    }
}

/// Muscle gain between two snapshots.
///
/// Weight up with body fat flat or down counts the whole weight gain as
/// muscle. Weight down with body fat falling by more than two points credits
/// 30% of the fat drop. Anything else, including a missing weight, is zero.
///
/// The body-fat change is only known when both snapshots have an estimate;
/// otherwise it reads as flat.
pub fn muscle_gain_estimate(first: &MeasurementRecord, last: &MeasurementRecord) -> Decimal {
    let (start_weight, end_weight) = match (first.body_weight, last.body_weight) {
        (Some(start), Some(end)) => (start, end),
        _ => return Decimal::ZERO,
    };

    let weight_delta = end_weight.saturating_sub(start_weight);
    let fat_delta = match (record_body_fat(first), record_body_fat(last)) {
        (start, end) if !start.is_zero() && !end.is_zero() => end - start,
        _ => Decimal::ZERO,
    };

    let gain = if weight_delta > Decimal::ZERO && fat_delta <= Decimal::ZERO {
        weight_delta
    } else if weight_delta < Decimal::ZERO && fat_delta < -RECOMP_FAT_DROP {
        RECOMP_MUSCLE_FACTOR * fat_delta.abs()
    } else {
        Decimal::ZERO
    };

    tracing::debug!(%weight_delta, %fat_delta, %gain, "Estimated muscle gain");

    round1(gain)
}

/// Muscle gain across the first and last weighed records in the window
pub fn muscle_gain_stat(records: &[MeasurementRecord], units: Units) -> DerivedStat {
    let unit = Metric::BodyWeight.unit(units);
    let mut weighed = records.iter().filter(|r| r.body_weight.is_some());
    let first = weighed.next();
    let last = weighed.last();

    match (first, last) {
        (Some(first), Some(last)) => {
            let gain = muscle_gain_estimate(first, last);
            DerivedStat::new(gain, gain, unit)
        }
        _ => DerivedStat::zero(unit),
    }
}

/// All dashboard stat cards for one filtered, date-ascending window
pub fn progress_summary(records: &[MeasurementRecord], units: Units) -> ProgressSummary {
    ProgressSummary {
        record_count: records.len(),
        first_date: records.first().map(|r| r.date),
        last_date: records.last().map(|r| r.date),
        weight: simple_delta(records, Metric::BodyWeight, units),
        waist: simple_delta(records, Metric::WaistSize, units),
        chest: simple_delta(records, Metric::ChestSize, units),
        biceps: simple_delta(records, Metric::BicepsSize, units),
        thigh: simple_delta(records, Metric::ThighSize, units),
        body_fat: body_fat_stat(records),
        muscle_gain: muscle_gain_stat(records, units),
    }
}
