//! Integrations with the host application.
//!
//! This module provides adapters for the collaborators of an export job:
//!
//! - [`host`] - Traits for the document model, failure reporting and the export codec
//! - [`snapshot`] - In-memory document loaded from a JSON snapshot
//! - [`codec`] - Manifest-writing export codec
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the host application and
//! enable testing with in-memory implementations. The export core only talks
//! to the traits in [`host`].
//!
//! ```rust,no_run
//! use dwgbatch::adapters::host::HostDocument;
//! use dwgbatch::adapters::snapshot::SnapshotDocument;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let document = SnapshotDocument::from_file("tower.json")?;
//! for view in document.views() {
//!     println!("{} ({})", view.name, view.type_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod host;
pub mod snapshot;
