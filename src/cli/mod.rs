//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for dwgbatch using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// dwgbatch - batch export of document views to DWG
#[derive(Parser, Debug)]
#[command(name = "dwgbatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "dwgbatch.toml", env = "DWGBATCH_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DWGBATCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the selected views of a document
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a configuration file and a sample job input
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["dwgbatch", "export", "--document", "tower.json"]);
        assert_eq!(cli.config, "dwgbatch.toml");
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.document.to_str(), Some("tower.json"));
                assert!(args.params.is_none());
                assert!(args.output_dir.is_none());
            }
            other => panic!("expected export, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_export_requires_document() {
        assert!(Cli::try_parse_from(["dwgbatch", "export"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["dwgbatch", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["dwgbatch", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["dwgbatch", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["dwgbatch", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
