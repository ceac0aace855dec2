//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::core::export::selection::SkipReason;
use crate::domain::{CodecError, DwgBatchError, ViewId};
use chrono::{DateTime, Utc};
use std::error::Error as _;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// A view written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedView {
    /// View that was exported
    pub view_id: ViewId,

    /// File written by the codec
    pub path: PathBuf,
}

/// Summary of an export job
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Unique id of this job run
    pub job_id: Uuid,

    /// When the job started
    pub started_at: DateTime<Utc>,

    /// When the job finished
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of views selected for export
    pub total_views: usize,

    /// Files written, in export order
    pub exported: Vec<ExportedView>,

    /// Candidate views left out of the selection
    pub skipped: Vec<(ViewId, SkipReason)>,

    /// Name of the export settings the options were based on
    pub settings_name: Option<String>,

    /// Whether the document mutations of the job were rolled back
    pub rolled_back: bool,

    /// Duration of the job
    pub duration: Duration,

    /// Errors encountered during the job
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            job_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            total_views: 0,
            exported: Vec::new(),
            skipped: Vec::new(),
            settings_name: None,
            rolled_back: false,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Mark the job finished now
    pub fn finish(mut self, duration: Duration) -> Self {
        self.finished_at = Some(Utc::now());
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Record a written file
    pub fn add_exported(&mut self, view_id: ViewId, path: PathBuf) {
        self.exported.push(ExportedView { view_id, path });
    }

    /// Check if the job succeeded
    ///
    /// Files written before a failure stay on disk, so a failed job can still
    /// have exported views.
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty() && self.total_views > 0 && self.exported.len() == self.total_views
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            job_id = %self.job_id,
            total_views = self.total_views,
            exported = self.exported.len(),
            skipped = self.skipped.len(),
            rolled_back = self.rolled_back,
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Bad parameters, missing override file
    Configuration,
    /// Nothing to export, missing view set
    Selection,
    /// A transaction was rolled back by the resolution engine
    Validation,
    /// Document-model command rejected
    Host,
    /// Export codec failure
    Codec,
    /// Output directory or file system
    Io,
    /// Unknown error
    Unknown,
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Message of the underlying cause, if any
    pub inner: Option<String>,

    /// Optional context (e.g., view id, file name)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            inner: None,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

impl From<&DwgBatchError> for ExportError {
    fn from(error: &DwgBatchError) -> Self {
        let error_type = match error {
            DwgBatchError::Configuration(_) => ExportErrorType::Configuration,
            DwgBatchError::Selection(_) => ExportErrorType::Selection,
            DwgBatchError::Validation(_) => ExportErrorType::Validation,
            DwgBatchError::Host(_) => ExportErrorType::Host,
            DwgBatchError::Codec(_) => ExportErrorType::Codec,
            DwgBatchError::Io(_) => ExportErrorType::Io,
            DwgBatchError::Serialization(_) | DwgBatchError::Other(_) => ExportErrorType::Unknown,
        };

        let inner = match error {
            DwgBatchError::Codec(codec) => inner_message(codec),
            _ => None,
        };

        Self {
            error_type,
            message: error.to_string(),
            inner,
            context: None,
        }
    }
}

fn inner_message(error: &CodecError) -> Option<String> {
    error.source().map(ToString::to_string)
}
