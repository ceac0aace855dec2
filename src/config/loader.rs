//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::DwgBatchConfig;
use crate::domain::errors::DwgBatchError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DwgBatchConfig
/// 4. Applies environment variable overrides (DWGBATCH_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file is missing or unreadable, a
/// referenced environment variable is unset, parsing fails, or validation
/// fails.
///
/// # Examples
///
/// ```no_run
/// use dwgbatch::config::loader::load_config;
///
/// let config = load_config("dwgbatch.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DwgBatchConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DwgBatchError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DwgBatchError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Applies the same substitution, overrides and validation as [`load_config`].
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(contents: &str) -> Result<DwgBatchConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: DwgBatchConfig = toml::from_str(&contents)
        .map_err(|e| DwgBatchError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        DwgBatchError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("environment variable pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(DwgBatchError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using DWGBATCH_* prefix
///
/// Environment variables follow the pattern: DWGBATCH_<SECTION>_<KEY>
/// For example: DWGBATCH_EXPORT_OUTPUT_DIR, DWGBATCH_APPLICATION_LOG_LEVEL
fn apply_env_overrides(config: &mut DwgBatchConfig) {
    if let Ok(val) = std::env::var("DWGBATCH_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("DWGBATCH_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("DWGBATCH_EXPORT_FILE_EXTENSION") {
        config.export.file_extension = val;
    }
    if let Ok(val) = std::env::var("DWGBATCH_EXPORT_PARAMS_FILE") {
        config.export.params_file = val;
    }

    if let Ok(val) = std::env::var("DWGBATCH_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("DWGBATCH_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("DWGBATCH_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("DWGBATCH_TEST_SUBST_VAR", "out");
        let input = "output_dir = \"${DWGBATCH_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "output_dir = \"out\"\n");
        std::env::remove_var("DWGBATCH_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("DWGBATCH_TEST_MISSING_VAR");
        let input = "output_dir = \"${DWGBATCH_TEST_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("DWGBATCH_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("DWGBATCH_TEST_COMMENTED_VAR");
        let input = "# output_dir = \"${DWGBATCH_TEST_COMMENTED_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${DWGBATCH_TEST_COMMENTED_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-dwgbatch.toml");
        assert!(matches!(result, Err(DwgBatchError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[export]
output_dir = "out"
file_extension = "dxf"

[logging]
local_enabled = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.export.output_dir, "out");
        assert_eq!(config.export.file_extension, "dxf");
        assert_eq!(config.export.params_file, "params.json");
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_parse_config_invalid_value() {
        let result = parse_config("[logging]\nlocal_rotation = \"weekly\"\n");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Configuration validation failed"));
    }
}
