//! Export command implementation
//!
//! This module implements the `export` command, which exports the views
//! selected by the job input from a document snapshot.

use crate::adapters::codec::ManifestCodec;
use crate::adapters::snapshot::SnapshotDocument;
use crate::config::{load_config, load_params, DwgBatchConfig};
use crate::core::export::{ExportErrorType, ExportOrchestrator, ExportRequest, ExportSummary};
use crate::logging::TracingSink;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Document snapshot (JSON) to export from
    #[arg(short, long)]
    pub document: PathBuf,

    /// Override the job input file
    #[arg(short, long)]
    pub params: Option<String>,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = if Path::new(config_path).exists() {
            match load_config(config_path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load configuration");
                    eprintln!("Failed to load configuration: {e}");
                    return Ok(2);
                }
            }
        } else {
            tracing::info!(
                config_path = %config_path,
                "Configuration file not found, using defaults"
            );
            DwgBatchConfig::default()
        };

        // Apply CLI overrides
        if let Some(output_dir) = &self.output_dir {
            tracing::info!(output_dir = %output_dir, "Overriding output directory from CLI");
            config.export.output_dir = output_dir.clone();
        }

        if let Some(params) = &self.params {
            tracing::info!(params = %params, "Overriding job input file from CLI");
            config.export.params_file = params.clone();
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let params = match load_params(&config.export.params_file) {
            Ok(params) => params,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load job input");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let request = match ExportRequest::from_params(&params, &config.export) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(error = %e, "Invalid job input");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let mut document = match SnapshotDocument::from_file(&self.document) {
            Ok(document) => document,
            Err(e) if e.is_configuration() => {
                tracing::error!(error = %e, "Failed to open document");
                eprintln!("{e}");
                return Ok(2);
            }
            Err(e) => return Err(e.into()),
        };

        println!("🚀 Starting export...");
        println!();

        let codec = ManifestCodec::new();
        let sink = TracingSink;
        let summary = ExportOrchestrator::new(&mut document, &codec, &sink).run(&request);
        summary.log_summary();

        print_summary(&summary);
        Ok(exit_code(&summary))
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Job: {}", summary.job_id);
    if let Some(settings) = &summary.settings_name {
        println!("  Settings: {settings}");
    }
    println!("  Selected Views: {}", summary.total_views);
    println!("  Exported: {}", summary.exported.len());
    println!("  Skipped: {}", summary.skipped.len());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    for exported in &summary.exported {
        println!("  ✔ {}", exported.path.display());
    }

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(inner) = &error.inner {
                println!("    Cause: {inner}");
            }
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        println!();
    }
}

/// Maps a finished job to the process exit code
fn exit_code(summary: &ExportSummary) -> i32 {
    if summary.is_successful() {
        println!("✅ Export completed successfully!");
        return 0;
    }

    let configuration_only = !summary.errors.is_empty()
        && summary.errors.iter().all(|e| {
            matches!(
                e.error_type,
                ExportErrorType::Configuration | ExportErrorType::Selection
            )
        });

    if configuration_only {
        println!("❌ Export stopped by a configuration error");
        2
    } else {
        println!("❌ Export failed");
        1
    }
}
