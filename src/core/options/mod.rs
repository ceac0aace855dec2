//! Export option merging

pub mod merge;

pub use merge::{merge, resolve_override_file};
