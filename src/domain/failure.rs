//! Validation failure model
//!
//! A [`FailureRecord`] is an immutable snapshot of one failure raised by the
//! document's validation pass. The resolution engine reads records and
//! returns decisions; it never mutates them.

use super::ids::{ElementId, FailureKindId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure kind reported when a nested component (family) is corrupt
pub const FAMILY_IS_CORRUPT: &str = "FamilyIsCorruptError";

/// Severity of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("Warning"),
            Severity::Error => f.write_str("Error"),
        }
    }
}

/// Named corrective action attachable to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionType {
    Default,
    DetachElements,
    DeleteElements,
    SkipElements,
    MoveElements,
    FixElements,
    UnlockConstraints,
    SetValue,
    ShowElements,
    Others,
}

impl fmt::Display for ResolutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Decision returned to the host for one validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionVerdict {
    /// Nothing was handled; let the host re-evaluate on its own
    Continue,
    /// Failures were handled; commit and re-validate
    ProceedWithCommit,
    /// Abort the transaction
    ProceedWithRollback,
}

impl fmt::Display for ResolutionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionVerdict::Continue => f.write_str("Continue"),
            ResolutionVerdict::ProceedWithCommit => f.write_str("ProceedWithCommit"),
            ResolutionVerdict::ProceedWithRollback => f.write_str("ProceedWithRollBack"),
        }
    }
}

/// Identity of a failure instance across re-evaluation passes
///
/// Two records describe the same failure when they share a kind and the same
/// set of implicated elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FailureKey {
    kind: FailureKindId,
    elements: Vec<ElementId>,
}

impl fmt::Display for FailureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements: Vec<String> = self.elements.iter().map(ToString::to_string).collect();
        write!(f, "{}[{}]", self.kind, elements.join(","))
    }
}

/// One validation failure raised during a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    pub severity: Severity,

    /// Failure definition id
    pub kind: FailureKindId,

    /// Human readable description text
    #[serde(default)]
    pub description: String,

    /// Elements implicated by the failure
    #[serde(default)]
    pub elements: Vec<ElementId>,

    /// Resolution the host will apply unless told otherwise
    #[serde(default)]
    pub current_resolution: Option<ResolutionType>,

    /// Resolutions the host offers for this failure
    #[serde(default)]
    pub available_resolutions: Vec<ResolutionType>,

    /// Resolutions already attempted for this failure, oldest first
    #[serde(default)]
    pub attempted: Vec<ResolutionType>,
}

impl FailureRecord {
    /// Creates a failure with no elements and no resolutions
    pub fn new(severity: Severity, kind: FailureKindId, description: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            description: description.into(),
            elements: Vec::new(),
            current_resolution: None,
            available_resolutions: Vec::new(),
            attempted: Vec::new(),
        }
    }

    /// Creates an error-severity failure
    pub fn error(kind: FailureKindId, description: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, description)
    }

    /// Creates a warning-severity failure
    pub fn warning(kind: FailureKindId, description: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, description)
    }

    /// Sets the implicated elements
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = ElementId>) -> Self {
        self.elements = elements.into_iter().collect();
        self
    }

    /// Sets the offered resolutions; the first one becomes current if none is set
    pub fn with_resolutions(mut self, resolutions: impl IntoIterator<Item = ResolutionType>) -> Self {
        self.available_resolutions = resolutions.into_iter().collect();
        if self.current_resolution.is_none() {
            self.current_resolution = self.available_resolutions.first().copied();
        }
        self
    }

    /// Sets the attempted-resolution history
    pub fn with_attempted(mut self, attempted: impl IntoIterator<Item = ResolutionType>) -> Self {
        self.attempted = attempted.into_iter().collect();
        self
    }

    /// Returns true when the host offers a resolution of the given type
    pub fn has_resolution_of_type(&self, resolution: ResolutionType) -> bool {
        self.available_resolutions.contains(&resolution)
    }

    /// Resolution the host applies when no strategy is chosen explicitly
    pub fn default_resolution(&self) -> ResolutionType {
        self.current_resolution
            .or_else(|| self.available_resolutions.first().copied())
            .unwrap_or(ResolutionType::Default)
    }

    /// Identity used to correlate the same failure across passes
    pub fn key(&self) -> FailureKey {
        let mut elements = self.elements.clone();
        elements.sort();
        elements.dedup();
        FailureKey {
            kind: self.kind.clone(),
            elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(s: &str) -> FailureKindId {
        FailureKindId::new(s).unwrap()
    }

    #[test]
    fn test_with_resolutions_sets_current() {
        let f = FailureRecord::error(kind("Overlap"), "Elements overlap").with_resolutions([
            ResolutionType::DetachElements,
            ResolutionType::DeleteElements,
        ]);
        assert_eq!(f.current_resolution, Some(ResolutionType::DetachElements));
        assert!(f.has_resolution_of_type(ResolutionType::DeleteElements));
        assert!(!f.has_resolution_of_type(ResolutionType::MoveElements));
    }

    #[test]
    fn test_default_resolution_fallback() {
        let f = FailureRecord::error(kind("Overlap"), "");
        assert_eq!(f.default_resolution(), ResolutionType::Default);
    }

    #[test]
    fn test_key_ignores_element_order() {
        let a = FailureRecord::error(kind("Overlap"), "a")
            .with_elements([ElementId::new(3), ElementId::new(1)]);
        let b = FailureRecord::error(kind("Overlap"), "b")
            .with_elements([ElementId::new(1), ElementId::new(3)]);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().to_string(), "Overlap[1,3]");
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(
            ResolutionVerdict::ProceedWithRollback.to_string(),
            "ProceedWithRollBack"
        );
    }

    #[test]
    fn test_failure_record_deserialize() {
        let json = r#"{
            "severity": "Error",
            "kind": "FamilyIsCorruptError",
            "elements": [101, 102],
            "availableResolutions": ["DeleteElements"]
        }"#;
        let f: FailureRecord = serde_json::from_str(json).unwrap();
        assert_eq!(f.severity, Severity::Error);
        assert_eq!(f.kind.as_str(), FAMILY_IS_CORRUPT);
        assert_eq!(f.elements.len(), 2);
        assert!(f.attempted.is_empty());
    }
}
