use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Body measurement fields that can be charted and compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    BodyWeight,
    WaistSize,
    ChestSize,
    BicepsSize,
    ThighSize,
}

impl Metric {
    /// All metrics in dashboard display order
    pub const ALL: [Metric; 5] = [
        Metric::BodyWeight,
        Metric::WaistSize,
        Metric::ChestSize,
        Metric::BicepsSize,
        Metric::ThighSize,
    ];

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Metric::BodyWeight => "Body Weight",
            Metric::WaistSize => "Waist",
            Metric::ChestSize => "Chest",
            Metric::BicepsSize => "Biceps",
            Metric::ThighSize => "Thigh",
        }
    }

    /// Field name used in CSV headers and JSON
    pub fn key(&self) -> &'static str {
        match self {
            Metric::BodyWeight => "body_weight",
            Metric::WaistSize => "waist_size",
            Metric::ChestSize => "chest_size",
            Metric::BicepsSize => "biceps_size",
            Metric::ThighSize => "thigh_size",
        }
    }

    /// Unit the metric is recorded in
    pub fn unit(&self, units: Units) -> &'static str {
        match (self, units) {
            (Metric::BodyWeight, Units::Metric) => "kg",
            (Metric::BodyWeight, Units::Imperial) => "lbs",
            (_, Units::Metric) => "cm",
            (_, Units::Imperial) => "in",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "body_weight" | "weight" | "bodyweight" => Ok(Metric::BodyWeight),
            "waist_size" | "waist" => Ok(Metric::WaistSize),
            "chest_size" | "chest" => Ok(Metric::ChestSize),
            "biceps_size" | "biceps" | "bicep" => Ok(Metric::BicepsSize),
            "thigh_size" | "thigh" | "thighs" => Ok(Metric::ThighSize),
            _ => Err(format!("Invalid metric: {}", s)),
        }
    }
}

/// Trailing window used to restrict charts and stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1m", alias = "1 month")]
    OneMonth,
    #[serde(rename = "3m", alias = "3 months")]
    ThreeMonths,
    #[serde(rename = "6m", alias = "6 months")]
    SixMonths,
    #[serde(rename = "1y", alias = "1 year")]
    OneYear,
}

impl TimeRange {
    pub fn months(&self) -> u32 {
        match self {
            TimeRange::OneMonth => 1,
            TimeRange::ThreeMonths => 3,
            TimeRange::SixMonths => 6,
            TimeRange::OneYear => 12,
        }
    }

    /// Earliest date (inclusive) that falls inside the window ending at `today`.
    ///
    /// Month arithmetic clamps to the last day of shorter months, so the
    /// cutoff for one month before March 31st is February 28th/29th.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(self.months()))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::ThreeMonths
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeRange::OneMonth => "1 month",
            TimeRange::ThreeMonths => "3 months",
            TimeRange::SixMonths => "6 months",
            TimeRange::OneYear => "1 year",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        match normalized.as_str() {
            "1m" | "1month" | "1mo" => Ok(TimeRange::OneMonth),
            "3m" | "3months" | "3mo" => Ok(TimeRange::ThreeMonths),
            "6m" | "6months" | "6mo" => Ok(TimeRange::SixMonths),
            "1y" | "1year" | "12m" | "12months" => Ok(TimeRange::OneYear),
            _ => Err(format!("Invalid time range: {}", s)),
        }
    }
}

/// Unit preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    Metric,
    Imperial,
}

impl Default for Units {
    fn default() -> Self {
        Units::Metric
    }
}

/// One submitted set of body measurements.
///
/// Optional fields mean "not measured this session". They are never zero
/// placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Date the measurements were taken
    pub date: NaiveDate,

    /// Subject (client) the record belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    pub body_weight: Option<Decimal>,
    pub waist_size: Option<Decimal>,
    pub chest_size: Option<Decimal>,
    pub biceps_size: Option<Decimal>,
    pub thigh_size: Option<Decimal>,

    /// Free-form notes entered with the measurements
    pub notes: Option<String>,
}

impl MeasurementRecord {
    /// Create a record with no measurements for the given date
    pub fn new(date: NaiveDate) -> Self {
        MeasurementRecord {
            date,
            subject_id: None,
            body_weight: None,
            waist_size: None,
            chest_size: None,
            biceps_size: None,
            thigh_size: None,
            notes: None,
        }
    }

    /// Builder-style setter for a single metric
    pub fn with(mut self, metric: Metric, value: Decimal) -> Self {
        *self.value_mut(metric) = Some(value);
        self
    }

    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    /// Value of the given metric, if it was measured
    pub fn value(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::BodyWeight => self.body_weight,
            Metric::WaistSize => self.waist_size,
            Metric::ChestSize => self.chest_size,
            Metric::BicepsSize => self.biceps_size,
            Metric::ThighSize => self.thigh_size,
        }
    }

    fn value_mut(&mut self, metric: Metric) -> &mut Option<Decimal> {
        match metric {
            Metric::BodyWeight => &mut self.body_weight,
            Metric::WaistSize => &mut self.waist_size,
            Metric::ChestSize => &mut self.chest_size,
            Metric::BicepsSize => &mut self.biceps_size,
            Metric::ThighSize => &mut self.thigh_size,
        }
    }

    /// True when no metric at all was recorded
    pub fn is_blank(&self) -> bool {
        Metric::ALL.iter().all(|m| self.value(*m).is_none())
    }
}

/// Single-metric chart point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// `M/D` label for the axis
    pub display_date: String,

    /// Date of the source record
    pub original_date: NaiveDate,

    pub value: Decimal,
}

/// Chart point carrying every metric; absent values stay `None`
/// so the renderer can break the line instead of interpolating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiMetricPoint {
    pub display_date: String,
    pub original_date: NaiveDate,
    pub body_weight: Option<Decimal>,
    pub waist_size: Option<Decimal>,
    pub chest_size: Option<Decimal>,
    pub biceps_size: Option<Decimal>,
    pub thigh_size: Option<Decimal>,
}

impl MultiMetricPoint {
    pub fn value(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::BodyWeight => self.body_weight,
            Metric::WaistSize => self.waist_size,
            Metric::ChestSize => self.chest_size,
            Metric::BicepsSize => self.biceps_size,
            Metric::ThighSize => self.thigh_size,
        }
    }
}

/// Summary number shown next to a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStat {
    pub value: Decimal,
    pub change: Decimal,
    pub unit: String,
}

impl DerivedStat {
    pub fn new(value: Decimal, change: Decimal, unit: impl Into<String>) -> Self {
        DerivedStat {
            value,
            change,
            unit: unit.into(),
        }
    }

    pub fn zero(unit: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO, unit)
    }
}

/// Stat cards for one filtered window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub record_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub weight: DerivedStat,
    pub waist: DerivedStat,
    pub chest: DerivedStat,
    pub biceps: DerivedStat,
    pub thigh: DerivedStat,
    pub body_fat: DerivedStat,
    pub muscle_gain: DerivedStat,
}

impl ProgressSummary {
    /// Delta card for a measured metric
    pub fn metric_stat(&self, metric: Metric) -> &DerivedStat {
        match metric {
            Metric::BodyWeight => &self.weight,
            Metric::WaistSize => &self.waist,
            Metric::ChestSize => &self.chest,
            Metric::BicepsSize => &self.biceps,
            Metric::ThighSize => &self.thigh,
        }
    }
}
