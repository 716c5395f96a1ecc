// Library interface for bodyrs modules
// Integration tests and the CLI binary use these

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod filter;
pub mod import;
pub mod logging;
pub mod models;
pub mod series;
pub mod source;
pub mod stats;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{BodyRsError, Result};
pub use filter::{filter_by_range, sort_by_date};
pub use series::{project_all, project_metric, SeriesOutcome};
pub use source::{load_measurements, FetchOutcome, MeasurementSource};
pub use stats::{body_fat_estimate, muscle_gain_estimate, progress_summary, simple_delta};
pub use logging::{LogConfig, LogFormat, LogLevel};
