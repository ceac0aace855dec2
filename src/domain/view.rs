//! View model types
//!
//! A read-only description of a document view as reported by the document
//! model. dwgbatch never edits views except for the display style of 3D views,
//! and that change is always rolled back at the end of a job.

use super::ids::ViewId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    FloorPlan,
    CeilingPlan,
    AreaPlan,
    Elevation,
    Section,
    Detail,
    ThreeD,
    Sheet,
    Schedule,
    Drafting,
    Legend,
    Rendering,
    Walkthrough,
    Other,
}

impl ViewKind {
    /// Views that are produced by the renderer rather than drawn
    pub fn is_rendering(&self) -> bool {
        matches!(self, ViewKind::Rendering | ViewKind::Walkthrough)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ViewKind::FloorPlan => "Floor Plan",
            ViewKind::CeilingPlan => "Ceiling Plan",
            ViewKind::AreaPlan => "Area Plan",
            ViewKind::Elevation => "Elevation",
            ViewKind::Section => "Section",
            ViewKind::Detail => "Detail",
            ViewKind::ThreeD => "3D View",
            ViewKind::Sheet => "Sheet",
            ViewKind::Schedule => "Schedule",
            ViewKind::Drafting => "Drafting",
            ViewKind::Legend => "Legend",
            ViewKind::Rendering => "Rendering",
            ViewKind::Walkthrough => "Walkthrough",
            ViewKind::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Graphic display style of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayStyle {
    Wireframe,
    HiddenLine,
    Shading,
    ShadingWithEdges,
    Realistic,
    FlatColors,
}

/// A view as described by the document model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewInfo {
    /// Stable unique id
    pub id: ViewId,

    /// View name shown in the project browser
    pub name: String,

    /// Name of the view's type (e.g. "3D View", "Floor Plan")
    pub type_name: String,

    /// View category
    pub kind: ViewKind,

    /// Whether the document model allows the view to be printed/exported
    #[serde(default = "default_true")]
    pub printable: bool,

    /// Whether the view is a view template
    #[serde(default)]
    pub is_template: bool,

    /// Current display style, when the view has one
    #[serde(default)]
    pub display_style: Option<DisplayStyle>,
}

impl ViewInfo {
    /// Creates a printable, non-template view
    pub fn new(
        id: ViewId,
        name: impl Into<String>,
        type_name: impl Into<String>,
        kind: ViewKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            type_name: type_name.into(),
            kind,
            printable: true,
            is_template: false,
            display_style: None,
        }
    }

    /// Marks the view as a template
    pub fn template(mut self) -> Self {
        self.is_template = true;
        self
    }

    /// Marks the view as not printable
    pub fn not_printable(mut self) -> Self {
        self.printable = false;
        self
    }

    /// Sets the display style
    pub fn with_display_style(mut self, style: DisplayStyle) -> Self {
        self.display_style = Some(style);
        self
    }

    /// Returns true for 3D views
    pub fn is_3d(&self) -> bool {
        self.kind == ViewKind::ThreeD
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ViewId {
        ViewId::new(s).unwrap()
    }

    #[test]
    fn test_view_builder() {
        let view = ViewInfo::new(id("v1"), "Level 1", "Floor Plan", ViewKind::FloorPlan);
        assert!(view.printable);
        assert!(!view.is_template);
        assert!(!view.is_3d());

        let view = view.template().not_printable();
        assert!(view.is_template);
        assert!(!view.printable);
    }

    #[test]
    fn test_rendering_kinds() {
        assert!(ViewKind::Rendering.is_rendering());
        assert!(ViewKind::Walkthrough.is_rendering());
        assert!(!ViewKind::ThreeD.is_rendering());
    }

    #[test]
    fn test_view_deserialize_defaults() {
        let json = r#"{"id": "v3", "name": "{3D}", "typeName": "3D View", "kind": "ThreeD"}"#;
        let view: ViewInfo = serde_json::from_str(json).unwrap();
        assert!(view.printable);
        assert!(!view.is_template);
        assert!(view.is_3d());
        assert_eq!(view.display_style, None);
    }
}
