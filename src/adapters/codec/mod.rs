//! Export codecs
//!
//! The vector export itself belongs to the host. [`ManifestCodec`] stands in
//! for it: one JSON manifest per call, recording the views and the effective
//! options the host would have exported with.

pub mod manifest;

pub use manifest::{ExportManifest, ManifestCodec};
