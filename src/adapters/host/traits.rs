//! Host abstraction traits
//!
//! This module defines the narrow interfaces dwgbatch consumes from the host
//! application: the document model with its transaction primitives, the
//! validation/failure-reporting collaborator, and the export codec.

use crate::domain::{
    CodecError, DisplayStyle, ExportOptions, ExportSettings, FailureRecord, Result,
    ResolutionType, ResolutionVerdict, ViewId, ViewInfo,
};
use std::path::{Path, PathBuf};

/// Outcome of committing a nested transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    /// Changes are committed and visible to subsequent reads
    Committed,
    /// Failure processing rolled the transaction back
    RolledBack,
}

/// Access to the failures of the current validation pass
///
/// Implemented by the host for the duration of one pass.
pub trait FailureAccessor {
    /// Failures raised in this pass, in the order reported
    fn failures(&self) -> Vec<FailureRecord>;

    /// Applies a resolution to a failure
    ///
    /// # Errors
    ///
    /// Returns an error if the failure is unknown to the host or the
    /// resolution is not offered for it.
    fn resolve_failure(&mut self, failure: &FailureRecord, resolution: ResolutionType)
        -> Result<()>;

    /// Dismisses a warning
    ///
    /// # Errors
    ///
    /// Returns an error if the failure is not a warning of this pass.
    fn delete_warning(&mut self, failure: &FailureRecord) -> Result<()>;
}

/// Decides how a validation pass proceeds
///
/// The host calls the processor once per pass while committing a transaction.
pub trait FailuresProcessor {
    /// Handles the failures of one pass and returns the pass verdict
    fn process_failures(&mut self, accessor: &mut dyn FailureAccessor) -> ResolutionVerdict;
}

/// Document model consumed by the export job
///
/// The orchestrator is the only mutator while a job runs.
pub trait HostDocument {
    /// Document name without directory or extension
    fn title(&self) -> String;

    /// Location of the document on disk, when it has been saved
    fn path(&self) -> Option<&Path>;

    /// Looks up a view by its unique id
    fn view(&self, id: &ViewId) -> Option<ViewInfo>;

    /// All views of the document in document order
    fn views(&self) -> Vec<ViewInfo>;

    /// View ids of a named view set, `None` when the set does not exist
    fn view_set(&self, name: &str) -> Option<Vec<ViewId>>;

    /// Finds export settings by name
    fn find_export_settings(&self, name: &str) -> Option<ExportSettings>;

    /// Export settings currently marked active, if any
    fn active_export_settings(&self) -> Option<ExportSettings>;

    /// Creates export settings with default values
    ///
    /// # Errors
    ///
    /// Returns an error outside of a transaction or if the name is taken.
    fn create_export_settings(&mut self, name: &str) -> Result<ExportSettings>;

    /// Changes the display style of a view
    ///
    /// # Errors
    ///
    /// Returns an error outside of a transaction or for an unknown view.
    fn set_display_style(&mut self, view: &ViewId, style: DisplayStyle) -> Result<()>;

    /// Starts the outer transaction group
    ///
    /// # Errors
    ///
    /// Returns an error if a group is already open.
    fn start_group(&mut self, name: &str) -> Result<()>;

    /// Rolls back every change committed since the group started
    ///
    /// # Errors
    ///
    /// Returns an error if no group is open.
    fn rollback_group(&mut self) -> Result<()>;

    /// Starts a nested transaction
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction is already open.
    fn start_transaction(&mut self, name: &str) -> Result<()>;

    /// Commits the open transaction, running validation passes through `processor`
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open.
    fn commit_transaction(&mut self, processor: &mut dyn FailuresProcessor)
        -> Result<CommitStatus>;

    /// Discards the open transaction
    ///
    /// # Errors
    ///
    /// Returns an error if no transaction is open.
    fn rollback_transaction(&mut self) -> Result<()>;
}

/// Converts views into output files
pub trait ExportCodec {
    /// Writes one output file for the given views
    ///
    /// # Arguments
    ///
    /// * `directory` - Existing output directory
    /// * `file_name` - File name including extension
    /// * `views` - Views to write (one per call in dwgbatch)
    /// * `options` - Effective export configuration
    ///
    /// # Returns
    ///
    /// The path of the written file.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] for an invalid path, argument or document state.
    fn export(
        &self,
        directory: &Path,
        file_name: &str,
        views: &[ViewId],
        options: &ExportOptions,
    ) -> std::result::Result<PathBuf, CodecError>;
}
