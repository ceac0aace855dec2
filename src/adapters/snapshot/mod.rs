//! Reference host backed by a JSON document snapshot
//!
//! [`SnapshotDocument`] implements [`HostDocument`](crate::adapters::host::HostDocument)
//! in memory. It is what the `dwgbatch` binary exports from, and what tests
//! use to script validation failures on named transactions.

pub mod document;
pub mod model;

pub use document::{SnapshotBuilder, SnapshotDocument, DEFAULT_MAX_PASSES};
pub use model::{DocumentSnapshot, ScriptedFailure};
