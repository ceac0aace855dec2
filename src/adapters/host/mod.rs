//! Host application interfaces

pub mod traits;

pub use traits::{
    CommitStatus, ExportCodec, FailureAccessor, FailuresProcessor, HostDocument,
};
