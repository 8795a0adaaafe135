//! Personnel store trait.

use crate::Result;
use crate::models::Personnel;

/// Relational store for personnel records.
///
/// The store is the source of truth. Absence is reported as `None`/`false`,
/// never as an error.
pub trait PersonnelStore: Send + Sync {
    /// Inserts a record and returns the generated identifier.
    ///
    /// The record's own `id` is ignored.
    fn insert(&self, record: &Personnel) -> Result<i64>;

    /// Retrieves a record by identifier.
    fn get(&self, id: i64) -> Result<Option<Personnel>>;

    /// Lists every record ordered by identifier.
    fn list(&self) -> Result<Vec<Personnel>>;

    /// Replaces the record stored under `id`, including its role.
    ///
    /// Returns false if no such record exists.
    fn update(&self, id: i64, record: &Personnel) -> Result<bool>;

    /// Deletes a record. Returns false if no such record exists.
    fn delete(&self, id: i64) -> Result<bool>;

    /// Returns the total count of records.
    fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}
