//! Core business logic for dwgbatch.
//!
//! # Modules
//!
//! - [`failures`] - Validation failure classification, attempt tracking and resolution
//! - [`options`] - Merging sparse overrides into export options
//! - [`transaction`] - Nested transactions inside a rolled-back transaction group
//! - [`export`] - View selection, naming and the export orchestrator
//!
//! # Export Workflow
//!
//! 1. **Select views**: explicit ids, a named view set, or every printable view
//! 2. **Prepare options**: named, active or newly created settings, merged with overrides
//! 3. **Export**: shade 3D views in committed transactions, then call the codec per view
//! 4. **Roll back**: undo every document change made for the export
//!
//! Validation failures raised while committing are handled by the
//! [`failures::ResolutionEngine`].
//!
//! # Example
//!
//! ```rust,no_run
//! use dwgbatch::adapters::codec::ManifestCodec;
//! use dwgbatch::adapters::snapshot::SnapshotDocument;
//! use dwgbatch::core::export::{ExportOrchestrator, ExportRequest, ViewCriteria};
//! use dwgbatch::logging::TracingSink;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut document = SnapshotDocument::from_file("tower.json")?;
//! let codec = ManifestCodec::new();
//! let request = ExportRequest::new(
//!     ViewCriteria::All { include_rendering: false },
//!     "exportedDwgs",
//! );
//!
//! let summary = ExportOrchestrator::new(&mut document, &codec, &TracingSink).run(&request);
//! println!("Exported {} of {} views", summary.exported.len(), summary.total_views);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod failures;
pub mod options;
pub mod transaction;
