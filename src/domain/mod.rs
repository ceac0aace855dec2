//! Domain models and types for dwgbatch.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ViewId`], [`ElementId`], [`FailureKindId`])
//! - **View model** ([`ViewInfo`], [`ViewKind`], [`DisplayStyle`])
//! - **Validation failures** ([`FailureRecord`], [`Severity`], [`ResolutionType`],
//!   [`ResolutionVerdict`])
//! - **Export options** ([`ExportOptions`], [`SparseExportOptions`], [`ExportSettings`])
//! - **Error types** ([`DwgBatchError`], [`CodecError`]) and the [`Result`] alias
//!
//! # Type Safety
//!
//! ```rust
//! use dwgbatch::domain::{ElementId, ViewId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let view_id = ViewId::new("view-123")?;
//! let element = ElementId::new(42);
//!
//! // let wrong: ViewId = element;  // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod export_options;
pub mod failure;
pub mod ids;
pub mod result;
pub mod view;

// Re-export commonly used types for convenience
pub use errors::{CodecError, DwgBatchError};
pub use export_options::{
    ExportOptions, ExportSettings, ExportUnit, SolidGeometry, SparseExportOptions,
    DEFAULT_SETTINGS_NAME, NORMALIZED_SOLID_MODE,
};
pub use failure::{
    FailureKey, FailureRecord, ResolutionType, ResolutionVerdict, Severity, FAMILY_IS_CORRUPT,
};
pub use ids::{ElementId, FailureKindId, ViewId};
pub use result::Result;
pub use view::{DisplayStyle, ViewInfo, ViewKind};
