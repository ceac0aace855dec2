//! JSON manifest codec

use crate::adapters::host::ExportCodec;
use crate::domain::{CodecError, DwgBatchError, ExportOptions, Result, ViewId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Content written for one exported file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    pub file_name: String,
    pub views: Vec<ViewId>,
    pub options: ExportOptions,
    pub exported_at: DateTime<Utc>,
}

/// Codec writing an [`ExportManifest`] instead of drawing data
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestCodec;

impl ManifestCodec {
    pub fn new() -> Self {
        Self
    }

    /// Reads back a manifest written by this codec
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a manifest.
    pub fn read_manifest(path: impl AsRef<Path>) -> Result<ExportManifest> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            DwgBatchError::Serialization(format!(
                "Invalid export manifest {}: {}",
                path.display(),
                e
            ))
        })
    }
}

impl ExportCodec for ManifestCodec {
    fn export(
        &self,
        directory: &Path,
        file_name: &str,
        views: &[ViewId],
        options: &ExportOptions,
    ) -> std::result::Result<PathBuf, CodecError> {
        if !directory.is_dir() {
            return Err(CodecError::invalid_path(format!(
                "Output directory does not exist: {}",
                directory.display()
            )));
        }

        if file_name.trim().is_empty() {
            return Err(CodecError::invalid_argument("File name is empty"));
        }

        if file_name.contains(['/', '\\']) {
            return Err(CodecError::invalid_argument(format!(
                "File name `{file_name}` must not contain a path separator"
            )));
        }

        if views.is_empty() {
            return Err(CodecError::invalid_argument("No views given for export"));
        }

        let manifest = ExportManifest {
            file_name: file_name.to_string(),
            views: views.to_vec(),
            options: options.clone(),
            exported_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&manifest).map_err(|e| {
            CodecError::invalid_operation(
                "Failed to serialize export manifest",
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        let path = directory.join(file_name);
        fs::write(&path, json).map_err(|e| {
            CodecError::invalid_operation(format!("Failed to write {}", path.display()), e)
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExportUnit, SolidGeometry};
    use std::error::Error as _;
    use tempfile::TempDir;

    fn views() -> Vec<ViewId> {
        vec![ViewId::new("a1").unwrap()]
    }

    #[test]
    fn test_export_writes_manifest() {
        let dir = TempDir::new().unwrap();
        let options = ExportOptions {
            target_unit: ExportUnit::Millimeter,
            ..Default::default()
        }
        .normalized();

        let path = ManifestCodec::new()
            .export(dir.path(), "tower-Sheet - A101.dwg", &views(), &options)
            .unwrap();

        assert_eq!(path, dir.path().join("tower-Sheet - A101.dwg"));
        let manifest = ManifestCodec::read_manifest(&path).unwrap();
        assert_eq!(manifest.views, views());
        assert_eq!(manifest.options.target_unit, ExportUnit::Millimeter);
        assert_eq!(manifest.options.solid_mode, SolidGeometry::Acis);
    }

    #[test]
    fn test_missing_directory_is_invalid_path() {
        let dir = TempDir::new().unwrap();
        let result = ManifestCodec::new().export(
            &dir.path().join("missing"),
            "a.dwg",
            &views(),
            &ExportOptions::default(),
        );
        assert!(matches!(result, Err(CodecError::InvalidPath { .. })));
    }

    #[test]
    fn test_empty_views_is_invalid_argument() {
        let dir = TempDir::new().unwrap();
        let result =
            ManifestCodec::new().export(dir.path(), "a.dwg", &[], &ExportOptions::default());
        assert!(matches!(result, Err(CodecError::InvalidArgument { .. })));
    }

    #[test]
    fn test_bad_file_name_is_invalid_argument() {
        let dir = TempDir::new().unwrap();
        let codec = ManifestCodec::new();
        for name in ["", "  ", "sub/a.dwg"] {
            let result = codec.export(dir.path(), name, &views(), &ExportOptions::default());
            assert!(
                matches!(result, Err(CodecError::InvalidArgument { .. })),
                "{name:?}"
            );
        }
    }

    #[test]
    fn test_write_failure_keeps_inner_cause() {
        let dir = TempDir::new().unwrap();
        // A directory with the target name makes the write fail
        fs::create_dir(dir.path().join("a.dwg")).unwrap();

        let result =
            ManifestCodec::new().export(dir.path(), "a.dwg", &views(), &ExportOptions::default());
        match result {
            Err(err @ CodecError::InvalidOperation { .. }) => assert!(err.source().is_some()),
            other => panic!("expected invalid operation, got {other:?}"),
        }
    }
}
