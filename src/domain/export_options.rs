//! Export option types
//!
//! [`ExportOptions`] is the fully populated configuration handed to the codec.
//! [`SparseExportOptions`] is the user-supplied override where every field is
//! optional and only concrete values take part in a merge.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name given to export settings created when the document has none
pub const DEFAULT_SETTINGS_NAME: &str = "Export DWG Default";

/// Drawing unit written to the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExportUnit {
    #[default]
    Default,
    Inch,
    Foot,
    Millimeter,
    Centimeter,
    Meter,
}

/// How solid geometry is written to the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SolidGeometry {
    #[default]
    Polymesh,
    #[serde(rename = "ACIS")]
    Acis,
}

/// The only solids mode the exporter supports
pub const NORMALIZED_SOLID_MODE: SolidGeometry = SolidGeometry::Acis;

/// Effective export configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub target_unit: ExportUnit,

    /// Export using shared coordinates instead of internal origin
    #[serde(default)]
    pub shared_coords: bool,

    #[serde(default)]
    pub solid_mode: SolidGeometry,

    /// Layer mapping table, absolute once merged
    #[serde(default)]
    pub layer_mapping_file: Option<PathBuf>,
}

impl ExportOptions {
    /// Forces the solids mode to [`NORMALIZED_SOLID_MODE`]
    pub fn normalized(mut self) -> Self {
        self.solid_mode = NORMALIZED_SOLID_MODE;
        self
    }
}

/// Named export configuration stored in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub name: String,

    #[serde(default)]
    pub options: ExportOptions,
}

impl ExportSettings {
    /// Creates settings holding default option values
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: ExportOptions::default(),
        }
    }
}

/// Sparse user override of [`ExportOptions`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparseExportOptions {
    #[serde(default)]
    pub target_unit: Option<ExportUnit>,

    #[serde(default)]
    pub use_shared_coords: Option<bool>,

    #[serde(default)]
    pub solid_mode: Option<SolidGeometry>,

    /// Layer mapping table, relative paths resolve against the document directory
    #[serde(default)]
    pub layer_mapping_file: Option<String>,
}

impl SparseExportOptions {
    /// Returns true when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.target_unit.is_none()
            && self.use_shared_coords.is_none()
            && self.solid_mode.is_none()
            && self.layer_mapping_file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_forces_acis() {
        let options = ExportOptions::default();
        assert_eq!(options.solid_mode, SolidGeometry::Polymesh);
        assert_eq!(options.normalized().solid_mode, SolidGeometry::Acis);
    }

    #[test]
    fn test_sparse_options_deserialize() {
        let json = r#"{"targetUnit": "Millimeter", "solidMode": "ACIS"}"#;
        let sparse: SparseExportOptions = serde_json::from_str(json).unwrap();
        assert_eq!(sparse.target_unit, Some(ExportUnit::Millimeter));
        assert_eq!(sparse.solid_mode, Some(SolidGeometry::Acis));
        assert_eq!(sparse.use_shared_coords, None);
        assert!(!sparse.is_empty());
    }

    #[test]
    fn test_sparse_options_empty() {
        let sparse: SparseExportOptions = serde_json::from_str("{}").unwrap();
        assert!(sparse.is_empty());
    }
}
