//! Terminal rendering for the CLI

use crate::models::{DerivedStat, Metric, MultiMetricPoint, ProgressSummary, Units};
use crate::series::SeriesOutcome;
use rust_decimal::Decimal;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct AllMetricsRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Waist")]
    waist: String,
    #[tabled(rename = "Chest")]
    chest: String,
    #[tabled(rename = "Biceps")]
    biceps: String,
    #[tabled(rename = "Thigh")]
    thigh: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Stat")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Change")]
    change: String,
}

fn gap(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

fn stat_row(name: &str, stat: &DerivedStat) -> StatRow {
    StatRow {
        name: name.to_string(),
        value: format!("{} {}", stat.value, stat.unit),
        change: format!("{} {}", signed(stat.change), stat.unit),
    }
}

/// Table for a single-metric series, or the empty/single-point message
pub fn render_series(outcome: &SeriesOutcome, metric: Metric, units: Units) -> String {
    let unit = metric.unit(units);
    let rows: Vec<PointRow> = outcome
        .points()
        .iter()
        .map(|p| PointRow {
            date: p.display_date.clone(),
            value: format!("{} {}", p.value, unit),
        })
        .collect();

    let mut rendered = String::new();
    if !rows.is_empty() {
        rendered.push_str(&Table::new(rows).with(Style::rounded()).to_string());
        rendered.push('\n');
    }
    if let Some(message) = outcome.status_message(metric) {
        rendered.push_str(&message);
        rendered.push('\n');
    }
    rendered
}

/// Table of every metric per record; unmeasured cells show `-`
pub fn render_all_metrics(points: &[MultiMetricPoint]) -> String {
    if points.is_empty() {
        return "No measurements in this period\n".to_string();
    }

    let rows: Vec<AllMetricsRow> = points
        .iter()
        .map(|p| AllMetricsRow {
            date: p.display_date.clone(),
            weight: gap(p.body_weight),
            waist: gap(p.waist_size),
            chest: gap(p.chest_size),
            biceps: gap(p.biceps_size),
            thigh: gap(p.thigh_size),
        })
        .collect();

    format!("{}\n", Table::new(rows).with(Style::rounded()))
}

/// Stat cards as a table
pub fn render_summary(summary: &ProgressSummary) -> String {
    let mut rows: Vec<StatRow> = Metric::ALL
        .iter()
        .map(|m| stat_row(m.label(), summary.metric_stat(*m)))
        .collect();
    rows.push(stat_row("Est. Body Fat", &summary.body_fat));
    rows.push(stat_row("Est. Muscle Gain", &summary.muscle_gain));

    let period = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!(
            "{} records, {} to {}",
            summary.record_count,
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        ),
        _ => "No measurements in this period".to_string(),
    };

    format!("{}\n{}\n", period, Table::new(rows).with(Style::rounded()))
}
