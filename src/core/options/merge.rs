//! Export option merging
//!
//! Overlays a sparse user override on a base configuration. A field set in the
//! override replaces the base value, an unset field leaves it untouched, and
//! the solids mode is normalized afterwards no matter where it came from.

use crate::domain::{DwgBatchError, ExportOptions, Result, SparseExportOptions};
use std::path::{Path, PathBuf};

/// Merges `overrides` into `base`
///
/// Relative file paths in the override are resolved against `document_dir`
/// (the directory of the source document), never against the process working
/// directory.
///
/// # Errors
///
/// Returns a configuration error if an override file does not exist, or if a
/// relative path is given for a document that has no directory.
///
/// # Examples
///
/// ```
/// use dwgbatch::core::options::merge;
/// use dwgbatch::domain::{ExportOptions, ExportUnit, SolidGeometry, SparseExportOptions};
///
/// let overrides = SparseExportOptions {
///     target_unit: Some(ExportUnit::Millimeter),
///     ..Default::default()
/// };
/// let merged = merge(&ExportOptions::default(), &overrides, None).unwrap();
/// assert_eq!(merged.target_unit, ExportUnit::Millimeter);
/// assert_eq!(merged.solid_mode, SolidGeometry::Acis);
/// ```
pub fn merge(
    base: &ExportOptions,
    overrides: &SparseExportOptions,
    document_dir: Option<&Path>,
) -> Result<ExportOptions> {
    let mut merged = base.clone();

    if let Some(unit) = overrides.target_unit {
        merged.target_unit = unit;
    }

    if let Some(shared) = overrides.use_shared_coords {
        merged.shared_coords = shared;
    }

    if let Some(mode) = overrides.solid_mode {
        merged.solid_mode = mode;
    }

    if let Some(file) = overrides.layer_mapping_file.as_deref() {
        merged.layer_mapping_file = Some(resolve_override_file(file, document_dir)?);
    }

    Ok(merged.normalized())
}

/// Resolves an override file path against the document directory
///
/// # Errors
///
/// Returns a configuration error when the resolved file does not exist.
pub fn resolve_override_file(file: &str, document_dir: Option<&Path>) -> Result<PathBuf> {
    let candidate = Path::new(file);
    let resolved = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        match document_dir {
            Some(dir) => dir.join(candidate),
            None => {
                return Err(DwgBatchError::Configuration(format!(
                    "Cannot resolve override file `{file}`: the document has no directory"
                )))
            }
        }
    };

    if !resolved.is_file() {
        return Err(DwgBatchError::Configuration(format!(
            "Override file not found: {}",
            resolved.display()
        )));
    }

    Ok(resolved)
}
