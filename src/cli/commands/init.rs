//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file and a sample job input.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "dwgbatch.toml")]
    pub output: String,

    /// Path where to create the sample job input
    #[arg(long, default_value = "params.json")]
    pub params_output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing dwgbatch configuration");
        println!();

        for path in [&self.output, &self.params_output] {
            if Path::new(path).exists() && !self.force {
                println!("❌ File already exists: {path}");
                println!("   Use --force to overwrite");
                return Ok(2);
            }
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        let written = fs::write(&self.output, config_content)
            .and_then(|_| fs::write(&self.params_output, Self::generate_params()));

        match written {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!("✅ Job input created: {}", self.params_output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!(
                    "  2. Put the view ids to export in {}, or set exportAll",
                    self.params_output
                );
                println!("  3. Validate configuration: dwgbatch validate-config");
                println!("  4. Run export: dwgbatch export --document <snapshot.json>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration files");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# dwgbatch Configuration File

[application]
log_level = "info"

[export]
output_dir = "exportedDwgs"
file_extension = "dwg"
params_file = "params.json"

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# dwgbatch Configuration File
# Batch export of document views to DWG
#
# ${VAR_NAME} placeholders are replaced from the environment.
# Any value can be overridden with DWGBATCH_<SECTION>_<KEY>,
# e.g. DWGBATCH_EXPORT_OUTPUT_DIR=/tmp/out

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

[export]
# Directory receiving exported files, relative to the working directory
output_dir = "exportedDwgs"

# Extension appended to every exported file name
file_extension = "dwg"

# Job input: view selection, export settings name and overrides
params_file = "params.json"

[logging]
# Enable local file logging (JSON lines)
local_enabled = true

# Local log file path
local_path = "${DWGBATCH_LOG_DIR}"

# Log rotation (daily, hourly or size)
local_rotation = "daily"

# Maximum log file size in MB
local_max_size_mb = 100
"#
        .to_string()
    }

    /// Generate a sample job input
    fn generate_params() -> String {
        r#"{
  "viewIds": [],
  "viewSetName": null,
  "exportAll": true,
  "includeRenderingViews": false,
  "exportSettingName": null,
  "useCustomSettings": false,
  "customSettings": {
    "targetUnit": "Millimeter",
    "useSharedCoords": false
  }
}
"#
        .to_string()
    }
}
