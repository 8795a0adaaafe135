//! Personnel import service.
//!
//! Decodes a file and hands each record to a caller-supplied save step.
//! A bad record is counted and reported but never aborts the batch.

use crate::io::formats::{Format, resolve};
use crate::models::Personnel;
use crate::validation::ValidatorRegistry;
use crate::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

/// Result of an import operation.
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Number of records successfully saved.
    pub imported: usize,
    /// Number of records rejected by validation or by the save step.
    pub skipped_invalid: usize,
    /// Total records decoded from the file.
    pub total_processed: usize,
    /// Format the file was read with.
    pub format: Format,
    /// One line per skipped record.
    pub errors: Vec<String>,
}

impl ImportResult {
    /// Creates an empty result.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self {
            imported: 0,
            skipped_invalid: 0,
            total_processed: 0,
            format,
            errors: Vec::new(),
        }
    }

    /// Returns whether any records were imported.
    #[must_use]
    pub const fn has_imports(&self) -> bool {
        self.imported > 0
    }

    /// Returns whether any errors occurred.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of records that were not imported.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.total_processed - self.imported
    }
}

/// Service for importing personnel from exchange files.
#[derive(Debug, Clone)]
pub struct ImportService {
    /// Rules every record must pass before it is saved.
    validators: Arc<ValidatorRegistry>,
}

impl ImportService {
    /// Creates a new import service.
    #[must_use]
    pub const fn new(validators: Arc<ValidatorRegistry>) -> Self {
        Self { validators }
    }

    /// Imports every record of a file.
    ///
    /// `save` is called once per valid record; its failures are accounted
    /// like validation failures.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file as a whole cannot be read or decoded.
    #[instrument(skip(self, save), fields(path = %path.display()))]
    pub fn import_from_file<F>(
        &self,
        path: &Path,
        format: Option<Format>,
        save: F,
    ) -> Result<ImportResult>
    where
        F: FnMut(Personnel) -> Result<()>,
    {
        let resolved = resolve(path, format)?;
        let records = resolved.codec().read(path)?;

        let result = self.import_records(records, resolved, save);

        tracing::info!(
            format = %resolved,
            imported = result.imported,
            skipped = result.skipped_invalid,
            total = result.total_processed,
            "Import finished"
        );
        Ok(result)
    }

    /// Validates and saves already decoded records.
    pub fn import_records<F>(
        &self,
        records: Vec<Personnel>,
        format: Format,
        mut save: F,
    ) -> ImportResult
    where
        F: FnMut(Personnel) -> Result<()>,
    {
        let mut result = ImportResult::new(format);

        for (index, record) in records.into_iter().enumerate() {
            let current = index + 1;
            result.total_processed += 1;

            let outcome = self
                .validators
                .validate_personnel(&record)
                .and_then(|()| save(record));

            match outcome {
                Ok(()) => {
                    result.imported += 1;
                    metrics::counter!("personnel_imported_total", "format" => format.extension())
                        .increment(1);
                },
                Err(e) => {
                    tracing::warn!(record = current, error = %e, "Skipping import record");
                    metrics::counter!(
                        "personnel_import_skipped_total",
                        "format" => format.extension()
                    )
                    .increment(1);
                    result.skipped_invalid += 1;
                    result.errors.push(format!("Record {current}: {e}"));
                },
            }
        }

        result
    }
}
