//! Failure classification
//!
//! Sorts a single failure into what the resolution engine can do with it.

use crate::domain::{FailureRecord, ResolutionType, Severity, FAMILY_IS_CORRUPT};

/// What the engine may do with a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Warning: dismissed without a resolution
    Dismiss,
    /// Error with implicated elements: resolvable by the engine
    Resolve,
    /// Error with nothing to act on: left to the host
    Terminal,
}

/// Result of classifying one failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub severity: Severity,
    pub disposition: Disposition,
    /// The failing elements can be detached, which the engine turns into a delete
    pub detach_available: bool,
    /// The failure kind is the corrupt nested component case
    pub unrecoverable_corruption: bool,
}

impl Classification {
    /// Returns true when the failure leads to an action in this pass
    pub fn is_actionable(&self) -> bool {
        self.disposition != Disposition::Terminal
    }
}

/// Classifies one failure
pub fn classify(failure: &FailureRecord) -> Classification {
    let disposition = match failure.severity {
        Severity::Warning => Disposition::Dismiss,
        Severity::Error if failure.elements.is_empty() => Disposition::Terminal,
        Severity::Error => Disposition::Resolve,
    };

    Classification {
        severity: failure.severity,
        disposition,
        detach_available: failure.has_resolution_of_type(ResolutionType::DetachElements),
        unrecoverable_corruption: is_unrecoverable_corruption(failure),
    }
}

/// Returns true for the corrupt nested component failure kind
pub fn is_unrecoverable_corruption(failure: &FailureRecord) -> bool {
    failure.kind.as_str() == FAMILY_IS_CORRUPT
}
