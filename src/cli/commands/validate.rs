//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the dwgbatch configuration file and, optionally, a job input file.

use crate::config::{load_config, load_params};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also validate this job input file
    #[arg(short, long)]
    pub params: Option<String>,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  File Extension: {}", config.export.file_extension);
        println!("  Job Input: {}", config.export.params_file);
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        } else {
            println!("  Log Files: disabled");
        }
        println!();

        if let Some(params_path) = &self.params {
            match load_params(params_path) {
                Ok(params) => {
                    println!("✅ Job input is valid: {params_path}");
                    println!("  Export All: {}", params.export_all);
                    println!("  View Set: {}", params.view_set().unwrap_or("-"));
                    println!("  View Ids: {}", params.view_ids.len());
                    println!(
                        "  Export Settings: {}",
                        params.export_setting().unwrap_or("-")
                    );
                    println!("  Custom Settings: {}", params.overrides().is_some());
                    println!();
                }
                Err(e) => {
                    println!("❌ Job input validation failed");
                    println!("   Error: {e}");
                    return Ok(2);
                }
            }
        }

        Ok(0)
    }
}
