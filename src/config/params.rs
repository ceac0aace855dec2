//! Job input parameters
//!
//! The job input is a JSON payload (`params.json` by default) that selects the
//! views to export and, optionally, the export settings to start from and a
//! sparse set of option overrides.
//!
//! ```json
//! {
//!   "viewIds": ["44745acb-ebea-4fb9-a091-88d28bd746c7-000ea86d"],
//!   "viewSetName": null,
//!   "exportAll": false,
//!   "includeRenderingViews": false,
//!   "exportSettingName": "Client DWG",
//!   "useCustomSettings": true,
//!   "customSettings": { "targetUnit": "Millimeter", "useSharedCoords": true }
//! }
//! ```

use crate::domain::{DwgBatchError, Result, SparseExportOptions, ViewId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Deserialized job input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobParams {
    /// Explicit list of view unique ids
    #[serde(default)]
    pub view_ids: Vec<ViewId>,

    /// Name of a view set stored in the document
    #[serde(default)]
    pub view_set_name: Option<String>,

    /// Export every printable view of the document
    #[serde(default)]
    pub export_all: bool,

    /// With `export_all`, also export rendering-type views
    #[serde(default)]
    pub include_rendering_views: bool,

    /// Name of the export settings to start from
    #[serde(default)]
    pub export_setting_name: Option<String>,

    /// Whether `custom_settings` is applied at all
    #[serde(default)]
    pub use_custom_settings: bool,

    /// Sparse option overrides
    #[serde(default)]
    pub custom_settings: Option<SparseExportOptions>,
}

impl JobParams {
    /// Parses job parameters from JSON text
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed JSON or a `null` payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Option<JobParams> = serde_json::from_str(json).map_err(|e| {
            DwgBatchError::Configuration(format!("Invalid input params: {e}"))
        })?;
        params.ok_or_else(|| {
            DwgBatchError::Configuration("Invalid input params or empty JSON input".to_string())
        })
    }

    /// View set name, ignoring blank values
    pub fn view_set(&self) -> Option<&str> {
        self.view_set_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Export settings name, ignoring blank values
    pub fn export_setting(&self) -> Option<&str> {
        self.export_setting_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Overrides to merge, `None` unless enabled and present
    pub fn overrides(&self) -> Option<&SparseExportOptions> {
        if self.use_custom_settings {
            self.custom_settings.as_ref()
        } else {
            None
        }
    }
}

/// Loads job parameters from a JSON file
///
/// # Errors
///
/// Returns a configuration error if the file is missing, unreadable or invalid.
pub fn load_params(path: impl AsRef<Path>) -> Result<JobParams> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DwgBatchError::Configuration(format!(
            "Input params file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DwgBatchError::Configuration(format!(
            "Failed to read input params {}: {}",
            path.display(),
            e
        ))
    })?;

    JobParams::from_json(&contents)
}
