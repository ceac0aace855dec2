//! Serialized document snapshot

use crate::domain::{ElementId, ExportSettings, FailureRecord, ViewId, ViewInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// JSON form of a document
///
/// ```json
/// {
///   "title": "tower",
///   "path": "/projects/tower/tower.rvt",
///   "views": [
///     { "id": "a1", "name": "Level 1", "typeName": "Floor Plan", "kind": "FloorPlan" }
///   ],
///   "viewSets": { "Sheets": ["a1"] },
///   "exportSettings": [],
///   "activeSettings": null,
///   "elements": [101, 102],
///   "scriptedFailures": []
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    /// Document name without directory or extension
    pub title: String,

    /// Location of the source document
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub views: Vec<ViewInfo>,

    #[serde(default)]
    pub view_sets: BTreeMap<String, Vec<ViewId>>,

    #[serde(default)]
    pub export_settings: Vec<ExportSettings>,

    /// Name of the active predefined export settings
    #[serde(default)]
    pub active_settings: Option<String>,

    #[serde(default)]
    pub elements: Vec<ElementId>,

    #[serde(default)]
    pub scripted_failures: Vec<ScriptedFailure>,
}

/// A validation failure raised when a named transaction is committed
///
/// Each script fires once, on the first commit of a transaction whose name
/// matches `transaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedFailure {
    /// Transaction name that triggers the failure
    pub transaction: String,

    pub failure: FailureRecord,

    /// Survives every resolution except element deletion
    #[serde(default)]
    pub stubborn: bool,
}
