//! Export orchestrator - top-level driver of an export job
//!
//! A job moves through `SelectViews -> PrepareConfig -> (MutateAndExport)* ->
//! Rollback`. Document mutations needed for export (settings creation, display
//! styles) are committed in nested transactions inside one transaction group
//! that is rolled back at the end, whatever the outcome. Files already written
//! are not retracted when a later view fails.

use crate::adapters::host::{ExportCodec, HostDocument};
use crate::config::{ExportConfig, JobParams};
use crate::core::export::naming::export_file_name;
use crate::core::export::selection::{select_views, ViewCriteria, ViewSelection};
use crate::core::export::summary::{ExportError, ExportSummary};
use crate::core::failures::ResolutionEngine;
use crate::core::options::merge;
use crate::core::transaction::TransactionGroup;
use crate::domain::{
    DisplayStyle, DwgBatchError, ExportOptions, Result, SparseExportOptions,
    DEFAULT_SETTINGS_NAME,
};
use crate::logging::TraceSink;
use crate::trace_line;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Name of the outer transaction group of a job
pub const GROUP_NAME: &str = "Starts exporting DWG";

/// Nested transaction forcing a 3D view to the shaded style
pub const SHADE_TRANSACTION: &str = "Ensure 3D view uses the Shaded display style.";

/// Nested transaction creating default export settings
pub const CREATE_SETTINGS_TRANSACTION: &str = "Create the ExportDWGSettings with defaults.";

/// What to export and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// View selection strategy
    pub criteria: ViewCriteria,

    /// Named export settings to start from
    pub export_setting_name: Option<String>,

    /// Sparse overrides merged on top of the settings
    pub overrides: Option<SparseExportOptions>,

    /// Directory receiving the exported files
    pub output_dir: PathBuf,

    /// Extension of the exported files, without the dot
    pub file_extension: String,
}

impl ExportRequest {
    /// Creates a request with no named settings and no overrides
    pub fn new(criteria: ViewCriteria, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            criteria,
            export_setting_name: None,
            overrides: None,
            output_dir: output_dir.into(),
            file_extension: "dwg".to_string(),
        }
    }

    /// Builds a request from job parameters and the export configuration
    ///
    /// # Errors
    ///
    /// Returns a selection error when the parameters select no views.
    pub fn from_params(params: &JobParams, export: &ExportConfig) -> Result<Self> {
        Ok(Self {
            criteria: ViewCriteria::from_params(params)?,
            export_setting_name: params.export_setting().map(str::to_string),
            overrides: params.overrides().cloned(),
            output_dir: PathBuf::from(&export.output_dir),
            file_extension: export.file_extension.clone(),
        })
    }

    /// Set the named export settings
    pub fn with_setting_name(mut self, name: impl Into<String>) -> Self {
        self.export_setting_name = Some(name.into());
        self
    }

    /// Set the option overrides
    pub fn with_overrides(mut self, overrides: SparseExportOptions) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Set the output file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }
}

/// Export orchestrator
///
/// The orchestrator is the only mutator of the document while a job runs.
pub struct ExportOrchestrator<'a, D: HostDocument + ?Sized, C: ExportCodec + ?Sized> {
    document: &'a mut D,
    codec: &'a C,
    sink: &'a dyn TraceSink,
}

impl<'a, D: HostDocument + ?Sized, C: ExportCodec + ?Sized> ExportOrchestrator<'a, D, C> {
    /// Create a new orchestrator
    pub fn new(document: &'a mut D, codec: &'a C, sink: &'a dyn TraceSink) -> Self {
        Self {
            document,
            codec,
            sink,
        }
    }

    /// Execute the export job
    ///
    /// This is the main entry point. It:
    /// 1. Creates the output directory
    /// 2. Resolves the view selection
    /// 3. Starts the transaction group
    /// 4. Resolves and merges the export options
    /// 5. For each view, shades 3D views and invokes the codec
    /// 6. Rolls back the transaction group
    ///
    /// Errors never escape; they are logged to the trace and recorded in the
    /// returned summary.
    pub fn run(&mut self, request: &ExportRequest) -> ExportSummary {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        let sink = self.sink;
        let codec = self.codec;

        tracing::info!(job_id = %summary.job_id, "Starting export job");

        trace_line!(
            sink,
            "Logging the export path `{}`.",
            request.output_dir.display()
        );
        if let Err(e) = ensure_output_dir(&request.output_dir) {
            fail(sink, &mut summary, &e);
            return summary.finish(start_time.elapsed());
        }

        trace_line!(sink, "Collecting views...");
        let selection = match select_views(&*self.document, &request.criteria, sink) {
            Ok(selection) => selection,
            Err(e) => {
                fail(sink, &mut summary, &e);
                return summary.finish(start_time.elapsed());
            }
        };
        summary.total_views = selection.len();
        summary.skipped = selection.skipped().to_vec();

        trace_line!(sink, "Starting the export task...");
        let mut group = match TransactionGroup::start(&mut *self.document, GROUP_NAME) {
            Ok(group) => group,
            Err(e) => {
                fail(sink, &mut summary, &e);
                return summary.finish(start_time.elapsed());
            }
        };

        let mut engine = ResolutionEngine::new(sink);
        let outcome = export_views(
            &mut group,
            &mut engine,
            codec,
            sink,
            &selection,
            request,
            &mut summary,
        );

        match group.rollback() {
            Ok(undone) => {
                summary.rolled_back = true;
                tracing::debug!(
                    transactions = ?undone,
                    "Rolled back document changes made for export"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to roll back transaction group");
                summary.add_error(ExportError::from(&e).with_context(GROUP_NAME.to_string()));
            }
        }

        match outcome {
            Ok(()) => trace_line!(sink, "Exporting completed..."),
            Err(e) => fail(sink, &mut summary, &e),
        }

        summary.finish(start_time.elapsed())
    }
}

/// Runs one export job and reports success
///
/// Convenience wrapper around [`ExportOrchestrator::run`].
pub fn run_export<D, C>(
    document: &mut D,
    codec: &C,
    sink: &dyn TraceSink,
    request: &ExportRequest,
) -> bool
where
    D: HostDocument + ?Sized,
    C: ExportCodec + ?Sized,
{
    ExportOrchestrator::new(document, codec, sink)
        .run(request)
        .is_successful()
}

fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        DwgBatchError::Io(format!(
            "Failed to create output directory {}: {}",
            dir.display(),
            e
        ))
    })
}

fn export_views<D, C>(
    group: &mut TransactionGroup<'_, D>,
    engine: &mut ResolutionEngine<'_>,
    codec: &C,
    sink: &dyn TraceSink,
    selection: &ViewSelection,
    request: &ExportRequest,
    summary: &mut ExportSummary,
) -> Result<()>
where
    D: HostDocument + ?Sized,
    C: ExportCodec + ?Sized,
{
    let (settings_name, options) = prepare_options(group, engine, sink, request)?;
    summary.settings_name = Some(settings_name);

    let title = group.document().title();

    for selected in selection.views() {
        let view = group.document().view(&selected.id).ok_or_else(|| {
            DwgBatchError::Host(format!("View `{}` is no longer in the document", selected.id))
        })?;

        if view.is_3d() && view.display_style != Some(DisplayStyle::Shading) {
            group.commit(&mut *engine, SHADE_TRANSACTION, |document| {
                document.set_display_style(&view.id, DisplayStyle::Shading)
            })?;
        }

        let file_name = export_file_name(
            &title,
            &view.type_name,
            &view.name,
            &request.file_extension,
        );
        trace_line!(sink, "Exporting `{}`...", file_name);

        let path = codec.export(
            &request.output_dir,
            &file_name,
            std::slice::from_ref(&view.id),
            &options,
        )?;

        tracing::debug!(view = %view.id, path = %path.display(), "View exported");
        summary.add_exported(view.id, path);
    }

    Ok(())
}

/// Retrieves or creates the base settings and merges the overrides
///
/// Returns the settings name and the effective options.
fn prepare_options<D>(
    group: &mut TransactionGroup<'_, D>,
    engine: &mut ResolutionEngine<'_>,
    sink: &dyn TraceSink,
    request: &ExportRequest,
) -> Result<(String, ExportOptions)>
where
    D: HostDocument + ?Sized,
{
    trace_line!(sink, "Getting Export DWG settings.");

    let found = match request.export_setting_name.as_deref() {
        Some(name) => {
            trace_line!(
                sink,
                "- Getting Export DWG settings by given export setting name `{}`.",
                name
            );
            let settings = group.document().find_export_settings(name);
            if settings.is_none() {
                trace_line!(
                    sink,
                    "- Warning: No export DWG settings found with given export setting name `{}`.",
                    name
                );
            }
            settings
        }
        None => {
            trace_line!(
                sink,
                "- Getting Export DWG settings since no export setting name specified."
            );
            let settings = group.document().active_export_settings();
            if settings.is_none() {
                trace_line!(
                    sink,
                    "- Warning: No active predefined settings found for exporting DWG in the document."
                );
            }
            settings
        }
    };

    let settings = match found {
        Some(settings) => settings,
        None => match group.document().find_export_settings(DEFAULT_SETTINGS_NAME) {
            Some(existing) => existing,
            None => {
                trace_line!(sink, "- Creating an ExportDWGSettings with default values.");
                let created = group.commit(&mut *engine, CREATE_SETTINGS_TRANSACTION, |document| {
                    document.create_export_settings(DEFAULT_SETTINGS_NAME)
                })?;
                trace_line!(sink, "- Default ExportDWGSettings created.");
                created
            }
        },
    };

    trace_line!(sink, "Export DWG using settings `{}`.", settings.name);

    let document_dir = group
        .document()
        .path()
        .and_then(Path::parent)
        .map(Path::to_path_buf);

    let options = match request.overrides.as_ref() {
        Some(overrides) => {
            trace_line!(sink, "Applying custom export settings.");
            merge(&settings.options, overrides, document_dir.as_deref())?
        }
        None => settings.options.clone().normalized(),
    };

    Ok((settings.name, options))
}

fn fail(sink: &dyn TraceSink, summary: &mut ExportSummary, error: &DwgBatchError) {
    let export_error = ExportError::from(error);

    trace_line!(sink, "Error occured");
    trace_line!(sink, "{}", export_error.message);
    if let Some(inner) = export_error.inner.as_deref() {
        trace_line!(sink, "{}", inner);
    }

    tracing::error!(
        error_type = ?export_error.error_type,
        message = %export_error.message,
        "Export job failed"
    );
    summary.add_error(export_error);
}
