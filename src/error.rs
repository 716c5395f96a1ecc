//! Unified error hierarchy for bodyrs
//!
//! Errors carry enough structure to decide severity and to produce the
//! short notification text shown to the user when a fetch fails.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all bodyrs operations
#[derive(Debug, Error)]
pub enum BodyRsError {
    /// Measurement source errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Measurement import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while fetching measurements from a source
#[derive(Debug, Error)]
pub enum FetchError {
    /// Backing data is not reachable
    #[error("Source unavailable: {reason}")]
    Unavailable { reason: String },

    /// Source file does not exist
    #[error("Source file not found: {path}")]
    NotFound { path: PathBuf },
}

/// CSV import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// Required column missing from the header row
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    /// Row-level CSV parsing failure
    #[error("Parse error at line {line}: {reason}")]
    ParseError { line: u64, reason: String },

    /// Underlying CSV reader failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bodyrs operations
pub type Result<T> = std::result::Result<T, BodyRsError>;

impl BodyRsError {
    /// Check if error is transient. Nothing retries automatically; callers
    /// may use this to offer a manual refresh.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BodyRsError::Fetch(FetchError::Unavailable { .. }) | BodyRsError::Io(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BodyRsError::Fetch(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            BodyRsError::Fetch(FetchError::Unavailable { .. }) => {
                "Failed to load measurements. Please try again later.".to_string()
            }
            BodyRsError::Fetch(FetchError::NotFound { path }) => {
                format!("Could not find measurement data: {}", path.display())
            }
            BodyRsError::Import(_) => "Measurement data could not be read.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Expected, recoverable conditions such as a missing data file
    Warning,
    /// Data or output problems that need the user's attention
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = BodyRsError::Fetch(FetchError::NotFound {
            path: PathBuf::from("/data/measurements.csv"),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = BodyRsError::from(ImportError::MissingColumn {
            column: "date".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_error_retryable() {
        let err = BodyRsError::Fetch(FetchError::Unavailable {
            reason: "timeout".to_string(),
        });
        assert!(err.is_retryable());

        let err = BodyRsError::from(ExportError::UnsupportedFormat("xml".to_string()));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = BodyRsError::Fetch(FetchError::Unavailable {
            reason: "connection reset".to_string(),
        });
        assert!(err.user_message().contains("Failed to load measurements"));
        assert!(!err.user_message().contains("connection reset"));

        let err = BodyRsError::Fetch(FetchError::NotFound {
            path: PathBuf::from("measurements.csv"),
        });
        assert!(err.user_message().contains("Could not find"));

        let err = BodyRsError::from(ImportError::ParseError {
            line: 3,
            reason: "invalid utf-8".to_string(),
        });
        assert_eq!(err.user_message(), "Measurement data could not be read.");
    }
}
