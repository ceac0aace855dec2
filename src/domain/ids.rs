//! Domain identifier types with validation
//!
//! Newtype wrappers for document identifiers so that a view id can never be
//! passed where an element id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// View identifier newtype wrapper
///
/// Views are addressed by the document's stable unique id (the value that
/// appears in the job's `viewIds` list).
///
/// # Examples
///
/// ```
/// use dwgbatch::domain::ids::ViewId;
/// use std::str::FromStr;
///
/// let view_id = ViewId::from_str("a1b2c3d4-0000-0000-0000-00000004e3f2").unwrap();
/// assert_eq!(view_id.as_str(), "a1b2c3d4-0000-0000-0000-00000004e3f2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ViewId(String);

impl ViewId {
    /// Creates a new ViewId from a string
    ///
    /// Returns `Err` when the id is empty or whitespace only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("View ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the view ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ViewId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ViewId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ViewId> for String {
    fn from(id: ViewId) -> Self {
        id.0
    }
}

impl AsRef<str> for ViewId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Element identifier
///
/// Document elements are identified by an integer id, as reported by the
/// validation collaborator for failing elements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(i64);

impl ElementId {
    /// Creates a new ElementId
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ElementId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Stable identifier of a failure definition (the failure "kind")
///
/// # Examples
///
/// ```
/// use dwgbatch::domain::ids::FailureKindId;
///
/// let kind = FailureKindId::new("FamilyIsCorruptError").unwrap();
/// assert_eq!(kind.as_str(), "FamilyIsCorruptError");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FailureKindId(String);

impl FailureKindId {
    /// Creates a new FailureKindId
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Failure kind ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the failure kind as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FailureKindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FailureKindId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FailureKindId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FailureKindId> for String {
    fn from(id: FailureKindId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_id_valid() {
        let id = ViewId::new("view-123").unwrap();
        assert_eq!(id.as_str(), "view-123");
        assert_eq!(id.to_string(), "view-123");
    }

    #[test]
    fn test_view_id_empty() {
        assert!(ViewId::new("").is_err());
        assert!(ViewId::new("   ").is_err());
    }

    #[test]
    fn test_view_id_serde_rejects_empty() {
        let parsed: Result<ViewId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());

        let parsed: ViewId = serde_json::from_str("\"view-7\"").unwrap();
        assert_eq!(parsed.as_str(), "view-7");
    }

    #[test]
    fn test_element_id_display() {
        let id = ElementId::new(318_450);
        assert_eq!(id.to_string(), "318450");
        assert_eq!(id.value(), 318_450);
    }

    #[test]
    fn test_element_id_serde_transparent() {
        let ids: Vec<ElementId> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(ids, vec![ElementId::new(1), ElementId::new(2), ElementId::new(3)]);
    }

    #[test]
    fn test_failure_kind_id() {
        assert!(FailureKindId::new("").is_err());
        let kind = FailureKindId::from_str("DuplicateInstances").unwrap();
        assert_eq!(kind.to_string(), "DuplicateInstances");
    }
}
