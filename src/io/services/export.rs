//! Personnel export service.

use crate::Result;
use crate::io::formats::{Format, resolve};
use crate::models::Personnel;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Result of an export operation.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Number of records written.
    pub exported: usize,
    /// Format used for export.
    pub format: Format,
    /// File that was written.
    pub path: PathBuf,
}

/// Service for writing personnel to exchange files.
///
/// Exported records are not validated again.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportService;

impl ExportService {
    /// Creates a new export service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Writes `records` to `path`, replacing it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the format cannot be resolved, the extension
    /// does not match, or the file cannot be written.
    #[instrument(skip(self, records), fields(path = %path.display(), records = records.len()))]
    pub fn export_to_file(
        &self,
        path: &Path,
        format: Option<Format>,
        records: &[Personnel],
    ) -> Result<ExportResult> {
        let format = resolve(path, format)?;
        format.codec().write(path, records)?;

        tracing::info!(format = %format, exported = records.len(), "Export finished");
        Ok(ExportResult {
            exported: records.len(),
            format,
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Specialization;

    #[test]
    fn test_export_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plantilla.txt");
        let coach = Personnel::coach(1, "Luis", "Enrique", Specialization::HeadCoach);

        let err = ExportService::new()
            .export_to_file(&path, Some(Format::Csv), &[coach])
            .unwrap_err();
        assert!(err.is_storage());
        assert!(err.to_string().contains(".csv"));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("plantilla.json");
        let coach = Personnel::coach(1, "Luis", "Enrique", Specialization::HeadCoach);

        let result = ExportService::new()
            .export_to_file(&path, None, &[coach])
            .unwrap();
        assert_eq!(result.exported, 1);
        assert_eq!(result.format, Format::Json);
        assert!(std::fs::read_to_string(&path).unwrap().contains("Enrique"));
    }
}
