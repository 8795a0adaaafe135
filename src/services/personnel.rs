//! Personnel service.
//!
//! The surface front-ends call: file import and export plus validated CRUD.

use crate::config::RosterConfig;
use crate::io::{ExportResult, ExportService, Format, ImportResult, ImportService};
use crate::models::Personnel;
use crate::repository::PersonnelRepository;
use crate::storage::PersonnelStore;
use crate::validation::ValidatorRegistry;
use crate::{Error, Result, ViolationClass};
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

const ENTITY: &str = "personnel";

/// Service for personnel records.
#[derive(Debug)]
pub struct PersonnelService {
    /// Cache-aside repository.
    repository: PersonnelRepository,
    /// Validation rules applied before every write.
    validators: Arc<ValidatorRegistry>,
    /// Batch importer.
    importer: ImportService,
    /// Exporter.
    exporter: ExportService,
}

impl PersonnelService {
    /// Creates a service over an existing repository.
    #[must_use]
    pub fn new(repository: PersonnelRepository, validators: Arc<ValidatorRegistry>) -> Self {
        Self {
            repository,
            importer: ImportService::new(Arc::clone(&validators)),
            exporter: ExportService::new(),
            validators,
        }
    }

    /// Creates a service with the standard rules and the configured cache.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the cache bounds are invalid.
    pub fn with_store(store: Arc<dyn PersonnelStore>, config: &RosterConfig) -> Result<Self> {
        let repository = PersonnelRepository::new(store, &config.cache)?;
        Ok(Self::new(
            repository,
            Arc::new(ValidatorRegistry::standard()),
        ))
    }

    /// Returns the underlying repository.
    #[must_use]
    pub const fn repository(&self) -> &PersonnelRepository {
        &self.repository
    }

    /// Imports every valid record of a file.
    ///
    /// The format is detected from the extension when `format` is `None`.
    /// Invalid records and failed saves are reported in the result and do not
    /// stop the batch.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file as a whole cannot be read or decoded.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import_from_file(&self, path: &Path, format: Option<Format>) -> Result<ImportResult> {
        self.importer.import_from_file(path, format, |record| {
            self.repository.save(record).map(drop)
        })
    }

    /// Writes every stored record to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read, or a storage error if the
    /// file cannot be written.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn export_to_file(&self, path: &Path, format: Option<Format>) -> Result<ExportResult> {
        let records = self.repository.get_all()?;
        self.exporter.export_to_file(path, format, &records)
    }

    /// Returns every stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub fn get_all(&self) -> Result<Vec<Personnel>> {
        self.repository.get_all()
    }

    /// Returns the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is none.
    pub fn get_by_id(&self, id: i64) -> Result<Personnel> {
        self.repository
            .get_by_id(id)?
            .ok_or(Error::NotFound { entity: ENTITY, id })
    }

    /// Validates and stores a new record.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a rule is violated, or the store error.
    #[instrument(skip(self, record), fields(kind = %record.kind()))]
    pub fn save(&self, record: Personnel) -> Result<Personnel> {
        self.validators.validate_personnel(&record)?;
        self.repository.save(record)
    }

    /// Validates and replaces the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a rule is violated, or
    /// [`Error::NotFound`] if there is no such record.
    #[instrument(skip(self, record))]
    pub fn update(&self, id: i64, record: Personnel) -> Result<Personnel> {
        let mut record = record;
        record.id = id;
        self.validators.validate_personnel(&record)?;

        self.repository
            .update(id, record)?
            .ok_or(Error::NotFound { entity: ENTITY, id })
    }

    /// Deletes the record stored under `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns a not-found-class validation error for a negative id, or
    /// [`Error::NotFound`] if there is no such record.
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<Personnel> {
        if id < 0 {
            return Err(Error::validation(
                ViolationClass::NotFound,
                format!("no personnel can have negative id {id}"),
            ));
        }

        self.repository
            .delete(id)?
            .ok_or(Error::NotFound { entity: ENTITY, id })
    }
}
