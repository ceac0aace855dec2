//! View selection
//!
//! Resolves the views of a job by exactly one strategy. "Export all" wins over
//! a named view set, which wins over an explicit id list. Every strategy drops
//! templates and non-printable views and logs each skip.

use crate::adapters::host::HostDocument;
use crate::config::JobParams;
use crate::domain::{DwgBatchError, Result, ViewId, ViewInfo};
use crate::logging::TraceSink;
use crate::trace_line;
use std::collections::HashSet;
use std::fmt;

/// How the views of a job are chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCriteria {
    /// Every printable, non-template view of the document
    All { include_rendering: bool },
    /// The views of a named view set
    ViewSet(String),
    /// An explicit list of view ids
    Ids(Vec<ViewId>),
}

impl ViewCriteria {
    /// Builds the criteria from job parameters
    ///
    /// # Errors
    ///
    /// Returns a selection error when no strategy is requested.
    pub fn from_params(params: &JobParams) -> Result<Self> {
        if params.export_all {
            return Ok(ViewCriteria::All {
                include_rendering: params.include_rendering_views,
            });
        }

        if let Some(name) = params.view_set() {
            return Ok(ViewCriteria::ViewSet(name.to_string()));
        }

        if params.view_ids.is_empty() {
            return Err(DwgBatchError::Selection(
                "No view ids, view set name or export-all flag given".to_string(),
            ));
        }

        Ok(ViewCriteria::Ids(params.view_ids.clone()))
    }

    /// Origin recorded on views selected by these criteria
    pub fn origin(&self) -> SelectionOrigin {
        match self {
            ViewCriteria::All { .. } => SelectionOrigin::ExportAll,
            ViewCriteria::ViewSet(_) => SelectionOrigin::ViewSet,
            ViewCriteria::Ids(_) => SelectionOrigin::ExplicitIds,
        }
    }
}

/// Where a selected view came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    ExplicitIds,
    ViewSet,
    ExportAll,
}

/// One view of the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedView {
    pub id: ViewId,
    pub origin: SelectionOrigin,
}

/// Why a candidate view was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotFound,
    Template,
    NotPrintable,
    RenderingExcluded,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::NotFound => "not found",
            SkipReason::Template => "view template",
            SkipReason::NotPrintable => "not printable",
            SkipReason::RenderingExcluded => "rendering view excluded",
        };
        f.write_str(reason)
    }
}

/// Ordered, deduplicated views to export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSelection {
    views: Vec<SelectedView>,
    skipped: Vec<(ViewId, SkipReason)>,
}

impl ViewSelection {
    /// Selected views in export order
    pub fn views(&self) -> &[SelectedView] {
        &self.views
    }

    /// Selected view ids in export order
    pub fn ids(&self) -> Vec<ViewId> {
        self.views.iter().map(|v| v.id.clone()).collect()
    }

    /// Candidates that were left out, with the reason
    pub fn skipped(&self) -> &[(ViewId, SkipReason)] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn push(&mut self, id: ViewId, origin: SelectionOrigin, seen: &mut HashSet<ViewId>) {
        if seen.insert(id.clone()) {
            self.views.push(SelectedView { id, origin });
        }
    }
}

/// Resolves `criteria` against the document
///
/// # Errors
///
/// Returns a selection error when a named view set is missing or empty, or
/// when nothing is left to export.
pub fn select_views<D: HostDocument + ?Sized>(
    document: &D,
    criteria: &ViewCriteria,
    sink: &dyn TraceSink,
) -> Result<ViewSelection> {
    let origin = criteria.origin();
    let mut selection = ViewSelection::default();
    let mut seen = HashSet::new();

    match criteria {
        ViewCriteria::All { include_rendering } => {
            for view in document.views() {
                if view.kind.is_rendering() && !include_rendering {
                    trace_line!(
                        sink,
                        "Skipping rendering view `{}` ({}).",
                        view.name,
                        view.id
                    );
                    selection
                        .skipped
                        .push((view.id.clone(), SkipReason::RenderingExcluded));
                    continue;
                }
                match exclusion(&view) {
                    Some(reason) => {
                        trace_line!(
                            sink,
                            "Skipping view `{}` ({}): {}.",
                            view.name,
                            view.id,
                            reason
                        );
                        selection.skipped.push((view.id.clone(), reason));
                    }
                    None => selection.push(view.id, origin, &mut seen),
                }
            }
        }
        ViewCriteria::ViewSet(name) => {
            let ids = document.view_set(name).ok_or_else(|| {
                DwgBatchError::Selection(format!("View set `{name}` not found"))
            })?;
            if ids.is_empty() {
                return Err(DwgBatchError::Selection(format!(
                    "View set `{name}` contains no views"
                )));
            }
            select_ids(document, &ids, origin, sink, &mut selection, &mut seen);
        }
        ViewCriteria::Ids(ids) => {
            select_ids(document, ids, origin, sink, &mut selection, &mut seen);
        }
    }

    if selection.is_empty() {
        return Err(DwgBatchError::Selection("No views to be exported".to_string()));
    }

    trace_line!(sink, "{} view(s) selected for export.", selection.len());
    Ok(selection)
}

fn select_ids<D: HostDocument + ?Sized>(
    document: &D,
    ids: &[ViewId],
    origin: SelectionOrigin,
    sink: &dyn TraceSink,
    selection: &mut ViewSelection,
    seen: &mut HashSet<ViewId>,
) {
    for id in ids {
        let reason = match document.view(id) {
            Some(view) => exclusion(&view),
            None => Some(SkipReason::NotFound),
        };

        match reason {
            None => selection.push(id.clone(), origin, seen),
            Some(reason) => {
                trace_line!(
                    sink,
                    "Warning: No view found with given unique id `{}` or view cannot be exported.",
                    id
                );
                selection.skipped.push((id.clone(), reason));
            }
        }
    }
}

fn exclusion(view: &ViewInfo) -> Option<SkipReason> {
    if view.is_template {
        Some(SkipReason::Template)
    } else if !view.printable {
        Some(SkipReason::NotPrintable)
    } else {
        None
    }
}
