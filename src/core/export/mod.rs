//! Export orchestration
//!
//! This module provides the export job for dwgbatch:
//! - View selection by id list, view set or "export all"
//! - Output file naming
//! - The orchestrator driving one job inside a transaction group
//! - Summary and reporting

pub mod naming;
pub mod orchestrator;
pub mod selection;
pub mod summary;

pub use naming::export_file_name;
pub use orchestrator::{run_export, ExportOrchestrator, ExportRequest};
pub use selection::{
    select_views, SelectedView, SelectionOrigin, SkipReason, ViewCriteria, ViewSelection,
};
pub use summary::{ExportError, ExportErrorType, ExportSummary, ExportedView};
