//! Measurement source access
//!
//! Measurements live in an external store; this crate only asks for the most
//! recent records of a subject and works on the returned snapshot.

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::{BodyRsError, ErrorSeverity, FetchError, Result};
use crate::filter::sort_by_date;
use crate::import::MeasurementCsvParser;
use crate::models::MeasurementRecord;

/// Request/response access to a subject's measurements.
///
/// Implementations return at most `limit` of the most recent records. No
/// ordering is promised.
pub trait MeasurementSource {
    fn fetch_recent(
        &self,
        subject: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<MeasurementRecord>>> + Send;
}

/// Snapshot handed to the charting code after one fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchOutcome {
    /// Records sorted ascending by date; empty when the fetch failed
    pub records: Vec<MeasurementRecord>,

    /// Message to show the user when the fetch failed
    pub notification: Option<String>,
}

impl FetchOutcome {
    pub fn is_failure(&self) -> bool {
        self.notification.is_some()
    }
}

/// Fetch once and sort. A failure becomes an empty list plus a notification.
pub async fn load_measurements<S: MeasurementSource>(
    source: &S,
    subject: Option<&str>,
    limit: usize,
) -> FetchOutcome {
    match source.fetch_recent(subject, limit).await {
        Ok(mut records) => {
            sort_by_date(&mut records);
            tracing::info!(count = records.len(), subject = ?subject, "Loaded measurements");
            FetchOutcome {
                records,
                notification: None,
            }
        }
        Err(err) => {
            match err.severity() {
                ErrorSeverity::Warning => {
                    tracing::warn!(error = %err, subject = ?subject, "Measurement fetch failed")
                }
                ErrorSeverity::Error => {
                    tracing::error!(error = %err, subject = ?subject, "Measurement fetch failed")
                }
            }
            FetchOutcome {
                records: Vec::new(),
                notification: Some(err.user_message()),
            }
        }
    }
}

fn belongs_to(record: &MeasurementRecord, subject: Option<&str>) -> bool {
    match (subject, record.subject_id.as_deref()) {
        (Some(wanted), Some(owner)) => wanted == owner,
        // Files without a subject column hold a single subject's data
        _ => true,
    }
}

fn most_recent(mut records: Vec<MeasurementRecord>, limit: usize) -> Vec<MeasurementRecord> {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records.truncate(limit);
    records
}

/// Reads a CSV measurement export from disk
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MeasurementSource for CsvFileSource {
    async fn fetch_recent(
        &self,
        subject: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MeasurementRecord>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => FetchError::NotFound {
                    path: self.path.clone(),
                },
                _ => FetchError::Unavailable {
                    reason: e.to_string(),
                },
            })?;

        let records = MeasurementCsvParser::new().parse_str(&content)?;

        let owned: Vec<MeasurementRecord> = records
            .into_iter()
            .filter(|r| belongs_to(r, subject))
            .collect();

        Ok(most_recent(owned, limit))
    }
}

/// Fixed in-memory records, or a fixed failure
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<MeasurementRecord>,
    failure: Option<String>,
}

impl InMemorySource {
    pub fn new(records: Vec<MeasurementRecord>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    /// Source whose every fetch fails as unavailable
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(reason.into()),
        }
    }
}

impl MeasurementSource for InMemorySource {
    async fn fetch_recent(
        &self,
        subject: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MeasurementRecord>> {
        if let Some(reason) = &self.failure {
            return Err(BodyRsError::Fetch(FetchError::Unavailable {
                reason: reason.clone(),
            }));
        }

        let owned: Vec<MeasurementRecord> = self
            .records
            .iter()
            .filter(|r| belongs_to(r, subject))
            .cloned()
            .collect();

        Ok(most_recent(owned, limit))
    }
}
