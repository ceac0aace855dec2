//! Configuration management for dwgbatch.
//!
//! Two inputs drive a run:
//!
//! - [`DwgBatchConfig`] - application settings from `dwgbatch.toml`
//!   (log level, output directory, logging)
//! - [`JobParams`] - the job input from `params.json` (view selection,
//!   export settings name, option overrides)
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! output_dir = "exportedDwgs"
//! file_extension = "dwg"
//! params_file = "params.json"
//!
//! [logging]
//! local_enabled = true
//! local_path = "${DWGBATCH_LOG_DIR}"
//! ```
//!
//! `${VAR_NAME}` placeholders are substituted from the environment, and any
//! `DWGBATCH_<SECTION>_<KEY>` variable overrides the parsed value.
//!
//! ```rust,no_run
//! use dwgbatch::config::{load_config, load_params};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("dwgbatch.toml")?;
//! let params = load_params(&config.export.params_file)?;
//! println!("Export all views: {}", params.export_all);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod params;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use params::{load_params, JobParams};
pub use schema::{ApplicationConfig, DwgBatchConfig, ExportConfig, LoggingConfig};
