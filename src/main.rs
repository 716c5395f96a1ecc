use anyhow::{Context, Result};
use bodyrs::config::AppConfig;
use bodyrs::export::{self, ChartData, ExportFormat, ProgressReport};
use bodyrs::logging::{self, LogLevel};
use bodyrs::source::{self, CsvFileSource, FetchOutcome};
use bodyrs::{display, filter, series, stats, Metric, TimeRange};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

/// bodyrs - Body Measurement Progress CLI
///
/// Charts body measurements over a trailing window and derives progress
/// stats (deltas, estimated body fat, estimated muscle gain).
#[derive(Parser)]
#[command(name = "bodyrs")]
#[command(version)]
#[command(about = "Body measurement progress CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads measurements
#[derive(Args)]
struct SourceArgs {
    /// Measurement CSV file (defaults to the configured data file)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Subject (client) ID
    #[arg(short, long)]
    subject: Option<String>,

    /// Time range: 1m, 3m, 6m, 1y
    #[arg(short, long)]
    range: Option<TimeRange>,

    /// Number of most recent records to fetch
    #[arg(short, long)]
    limit: Option<usize>,

    /// Anchor date for the window (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a chart series for one metric or all metrics
    Chart {
        #[command(flatten)]
        source: SourceArgs,

        /// Metric to chart (weight, waist, chest, biceps, thigh)
        #[arg(short, long, conflicts_with = "all")]
        metric: Option<Metric>,

        /// Show every metric per record
        #[arg(short, long)]
        all: bool,
    },

    /// Show derived progress stats for the window
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Estimate body fat from waist and chest circumference
    BodyFat {
        /// Waist circumference
        #[arg(long)]
        waist: String,

        /// Chest circumference
        #[arg(long)]
        chest: String,
    },

    /// Export chart data and stats
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json)
        #[arg(short = 'F', long, default_value = "json")]
        format: String,

        /// Metric to export; all metrics when omitted
        #[arg(short, long)]
        metric: Option<Metric>,
    },

    /// Manage configuration
    Config {
        /// List all configuration values
        #[arg(long)]
        list: bool,

        /// Write a default config file
        #[arg(long)]
        init: bool,
    },
}

/// Window snapshot shared by the data commands
struct Window {
    records: Vec<bodyrs::MeasurementRecord>,
    range: TimeRange,
    as_of: NaiveDate,
    subject: Option<String>,
}

async fn load_window(args: &SourceArgs, config: &AppConfig) -> Result<Window> {
    let file = args
        .file
        .clone()
        .or_else(|| config.settings.data_file.clone())
        .context("No measurement file given; pass --file or set settings.data_file")?;

    let subject = args
        .subject
        .clone()
        .or_else(|| config.settings.default_subject.clone());
    let range = args.range.unwrap_or(config.settings.default_range);
    let limit = args.limit.unwrap_or(config.settings.fetch_limit);
    let as_of = args
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let FetchOutcome {
        records,
        notification,
    } = source::load_measurements(&CsvFileSource::new(file), subject.as_deref(), limit).await;

    if let Some(message) = notification {
        eprintln!("{}", message.yellow());
    }

    Ok(Window {
        records: filter::filter_by_range(&records, range, as_of),
        range,
        as_of,
        subject,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load(cli.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();
    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(cli.verbose, log_config.level);
    logging::init_logging(&log_config)?;

    if let Err(err) = &loaded {
        tracing::warn!(error = %format!("{:#}", err), "Config file not loaded, using defaults");
    }

    let units = config.settings.units;

    match cli.command {
        Commands::Chart {
            source,
            metric,
            all,
        } => {
            let window = load_window(&source, &config).await?;
            println!(
                "{}",
                format!("Measurements, last {}", window.range).blue().bold()
            );

            if all {
                print!("{}", display::render_all_metrics(&series::project_all(&window.records)));
            } else {
                let metric = metric.unwrap_or(config.settings.default_metric);
                let outcome = series::project_metric(&window.records, metric);
                println!("{}", metric.label().bold());
                print!("{}", display::render_series(&outcome, metric, units));
            }
        }

        Commands::Stats { source } => {
            let window = load_window(&source, &config).await?;
            println!(
                "{}",
                format!("Progress, last {}", window.range).cyan().bold()
            );
            let summary = stats::progress_summary(&window.records, units);
            print!("{}", display::render_summary(&summary));
        }

        Commands::BodyFat { waist, chest } => {
            let estimate = stats::body_fat_estimate(
                Some(stats::parse_metric_input(&waist)),
                Some(stats::parse_metric_input(&chest)),
            );

            if estimate.is_zero() {
                println!(
                    "{}",
                    "Waist and chest must both be positive numbers".yellow()
                );
            } else {
                println!("Estimated body fat: {}%", estimate.to_string().green().bold());
            }
        }

        Commands::Export {
            source,
            output,
            format,
            metric,
        } => {
            let format: ExportFormat = format.parse()?;
            let window = load_window(&source, &config).await?;

            let chart = match metric {
                Some(metric) => ChartData::Single {
                    metric,
                    series: series::project_metric(&window.records, metric),
                },
                None => ChartData::All {
                    points: series::project_all(&window.records),
                },
            };

            let report = ProgressReport {
                subject_id: window.subject,
                range: window.range,
                as_of: window.as_of,
                generated_at: chrono::Utc::now(),
                summary: stats::progress_summary(&window.records, units),
                chart,
            };

            export::export_report(&report, format, &output)?;
            println!(
                "{}",
                format!("✓ Exported to {}", output.display()).green()
            );
        }

        Commands::Config { list, init } => {
            if init {
                let mut fresh = AppConfig::default();
                match &cli.config {
                    Some(path) => fresh.save_to_file(path)?,
                    None => fresh.save_default()?,
                }
                println!("{}", "✓ Configuration written".green());
            }

            if list || !init {
                for (key, value) in config.entries() {
                    println!("{} = {}", key.bold(), value);
                }
            }
        }
    }

    Ok(())
}
