//! Integration tests for the export orchestrator
//!
//! Jobs run end to end against a snapshot document, writing manifests into a
//! temporary output directory.

use dwgbatch::adapters::codec::ManifestCodec;
use dwgbatch::adapters::host::{ExportCodec, HostDocument};
use dwgbatch::adapters::snapshot::SnapshotDocument;
use dwgbatch::core::export::orchestrator::SHADE_TRANSACTION;
use dwgbatch::core::export::{
    ExportErrorType, ExportOrchestrator, ExportRequest, SkipReason, ViewCriteria,
};
use dwgbatch::domain::{
    CodecError, DisplayStyle, ElementId, ExportOptions, ExportUnit, FailureKindId,
    FailureRecord, ResolutionType, SparseExportOptions, ViewId, ViewInfo, ViewKind,
};
use dwgbatch::logging::MemorySink;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn id(s: &str) -> ViewId {
    ViewId::new(s).unwrap()
}

fn floor_plan(view: &str, name: &str) -> ViewInfo {
    ViewInfo::new(id(view), name, "Floor Plan", ViewKind::FloorPlan)
}

fn three_d(view: &str) -> ViewInfo {
    ViewInfo::new(id(view), "{3D}", "3D View", ViewKind::ThreeD)
        .with_display_style(DisplayStyle::Wireframe)
}

fn exported_files(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

/// Codec that rejects one view and delegates the rest
struct RejectingCodec {
    inner: ManifestCodec,
    reject: ViewId,
}

impl ExportCodec for RejectingCodec {
    fn export(
        &self,
        directory: &Path,
        file_name: &str,
        views: &[ViewId],
        options: &ExportOptions,
    ) -> Result<PathBuf, CodecError> {
        if views.contains(&self.reject) {
            return Err(CodecError::invalid_argument(format!(
                "View `{}` cannot be exported",
                self.reject
            )));
        }
        self.inner.export(directory, file_name, views, options)
    }
}

#[test]
fn test_template_is_skipped_and_the_rest_exported() {
    let out = TempDir::new().unwrap();
    let sink = MemorySink::new();
    let codec = ManifestCodec::new();
    let mut doc = SnapshotDocument::builder("tower")
        .view(floor_plan("a", "Level 1"))
        .view(floor_plan("b", "Level 1 Template").template())
        .build();

    let request = ExportRequest::new(ViewCriteria::Ids(vec![id("a"), id("b")]), out.path());
    let summary = ExportOrchestrator::new(&mut doc, &codec, &sink).run(&request);

    assert!(summary.is_successful());
    assert_eq!(summary.total_views, 1);
    assert_eq!(summary.skipped, vec![(id("b"), SkipReason::Template)]);
    assert!(sink.contains("No view found with given unique id `b`"));
    assert_eq!(exported_files(out.path()), 1);
    assert!(out.path().join("tower-Floor Plan - Level 1.dwg").exists());
}

#[test]
fn test_missing_view_set_fails_before_any_export() {
    let out = TempDir::new().unwrap();
    let sink = MemorySink::new();
    let codec = ManifestCodec::new();
    let mut doc = SnapshotDocument::builder("tower")
        .view(floor_plan("a", "Level 1"))
        .build();

    let request = ExportRequest::new(ViewCriteria::ViewSet("Sheets".to_string()), out.path());
    let summary = ExportOrchestrator::new(&mut doc, &codec, &sink).run(&request);

    assert!(!summary.is_successful());
    assert!(!summary.rolled_back);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].error_type, ExportErrorType::Selection);
    assert!(summary.errors[0].message.contains("Sheets"));
    assert!(!sink.contains("Starting the export task..."));
    assert!(!doc.is_group_open());
    assert_eq!(exported_files(out.path()), 0);
}

#[test]
fn test_codec_failure_keeps_earlier_files_and_rolls_back() {
    let out = TempDir::new().unwrap();
    let sink = MemorySink::new();
    let codec = RejectingCodec {
        inner: ManifestCodec::new(),
        reject: id("b"),
    };
    let mut doc = SnapshotDocument::builder("tower")
        .view(three_d("a"))
        .view(floor_plan("b", "Level 2"))
        .view(floor_plan("c", "Level 3"))
        .build();

    let request = ExportRequest::new(
        ViewCriteria::Ids(vec![id("a"), id("b"), id("c")]),
        out.path(),
    );
    let summary = ExportOrchestrator::new(&mut doc, &codec, &sink).run(&request);

    assert!(!summary.is_successful());
    assert!(summary.rolled_back);
    assert_eq!(summary.exported.len(), 1);
    assert!(out.path().join("tower-3D View - _3D_.dwg").exists());
    assert!(!out.path().join("tower-Floor Plan - Level 3.dwg").exists());

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].error_type, ExportErrorType::Codec);
    assert!(summary.errors[0].message.contains("Invalid argument"));
    assert!(sink.contains("Error occured"));

    // The shading applied for view `a` did not survive the job
    assert_eq!(
        doc.view(&id("a")).unwrap().display_style,
        Some(DisplayStyle::Wireframe)
    );
    assert!(!doc.is_group_open());
}

#[test]
fn test_export_all_ignores_ids_and_view_set() {
    let out = TempDir::new().unwrap();
    let sink = MemorySink::new();
    let codec = ManifestCodec::new();
    let mut doc = SnapshotDocument::builder("tower")
        .view(floor_plan("a", "Level 1"))
        .view(floor_plan("b", "Level 2"))
        .view(ViewInfo::new(id("r"), "Lobby", "Rendering", ViewKind::Rendering))
        .view(floor_plan("t", "Template").template())
        .view_set("Sheets", vec![id("a")])
        .build();

    let params: dwgbatch::config::JobParams = serde_json::from_str(
        r#"{ "viewIds": ["b"], "viewSetName": "Sheets", "exportAll": true }"#,
    )
    .unwrap();
    let criteria = ViewCriteria::from_params(&params).unwrap();
    assert_eq!(
        criteria,
        ViewCriteria::All {
            include_rendering: false
        }
    );

    let request = ExportRequest::new(criteria, out.path());
    let summary = ExportOrchestrator::new(&mut doc, &codec, &sink).run(&request);

    assert!(summary.is_successful());
    let exported: Vec<ViewId> = summary.exported.iter().map(|e| e.view_id.clone()).collect();
    assert_eq!(exported, vec![id("a"), id("b")]);
    assert!(sink.contains("Skipping rendering view"));
}

#[test]
fn test_stubborn_shading_failure_fails_the_job() {
    let out = TempDir::new().unwrap();
    let sink = MemorySink::new();
    let codec = ManifestCodec::new();
    let mut doc = SnapshotDocument::builder("tower")
        .view(three_d("a"))
        .elements([ElementId::new(11)])
        .stubborn_failure_on(
            SHADE_TRANSACTION,
            FailureRecord::error(
                FailureKindId::new("Constraint").unwrap(),
                "Constraints are not satisfied",
            )
            .with_elements([ElementId::new(11)])
            .with_resolutions([
                ResolutionType::FixElements,
                ResolutionType::UnlockConstraints,
                ResolutionType::SkipElements,
                ResolutionType::MoveElements,
            ]),
        )
        .build();

    let request = ExportRequest::new(ViewCriteria::Ids(vec![id("a")]), out.path());
    let summary = ExportOrchestrator::new(&mut doc, &codec, &sink).run(&request);

    assert!(!summary.is_successful());
    assert!(summary.rolled_back);
    assert_eq!(summary.errors[0].error_type, ExportErrorType::Validation);
    assert!(sink.contains("Rolling back transaction."));
    assert_eq!(exported_files(out.path()), 0);
    assert!(doc.contains_element(ElementId::new(11)));
    assert_eq!(
        doc.view(&id("a")).unwrap().display_style,
        Some(DisplayStyle::Wireframe)
    );
}

#[test]
fn test_relative_override_file_resolves_against_document_dir() {
    let project = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(project.path().join("layers.txt"), "A-WALL 1\n").unwrap();

    let sink = MemorySink::new();
    let codec = ManifestCodec::new();
    let mut doc = SnapshotDocument::builder("tower")
        .path(project.path().join("tower.rvt"))
        .view(floor_plan("a", "Level 1"))
        .build();

    let request = ExportRequest::new(ViewCriteria::Ids(vec![id("a")]), out.path()).with_overrides(
        SparseExportOptions {
            target_unit: Some(ExportUnit::Millimeter),
            layer_mapping_file: Some("layers.txt".to_string()),
            ..Default::default()
        },
    );
    let summary = ExportOrchestrator::new(&mut doc, &codec, &sink).run(&request);

    assert!(summary.is_successful());
    assert!(sink.contains("Applying custom export settings."));
    let manifest = ManifestCodec::read_manifest(&summary.exported[0].path).unwrap();
    assert_eq!(manifest.options.target_unit, ExportUnit::Millimeter);
    assert_eq!(
        manifest.options.layer_mapping_file,
        Some(project.path().join("layers.txt"))
    );
}

#[test]
fn test_missing_override_file_is_a_configuration_error() {
    let project = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let sink = MemorySink::new();
    let codec = ManifestCodec::new();
    let mut doc = SnapshotDocument::builder("tower")
        .path(project.path().join("tower.rvt"))
        .view(floor_plan("a", "Level 1"))
        .build();

    let request = ExportRequest::new(ViewCriteria::Ids(vec![id("a")]), out.path()).with_overrides(
        SparseExportOptions {
            layer_mapping_file: Some("missing.txt".to_string()),
            ..Default::default()
        },
    );
    let summary = ExportOrchestrator::new(&mut doc, &codec, &sink).run(&request);

    assert!(!summary.is_successful());
    assert!(summary.rolled_back);
    assert_eq!(summary.errors[0].error_type, ExportErrorType::Configuration);
    assert_eq!(exported_files(out.path()), 0);
}
