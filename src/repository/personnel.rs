//! Personnel repository.

use crate::config::CacheConfig;
use crate::models::Personnel;
use crate::storage::{ExpiringCache, PersonnelStore};
use crate::{Result, current_timestamp};
use std::sync::Arc;
use tracing::instrument;

/// Cache-aside repository for personnel records.
///
/// # Cache Discipline
///
/// | Operation | Store | Cache |
/// |-----------|-------|-------|
/// | `get_all` | read | bypassed |
/// | `get_by_id` | read on miss | populated on miss |
/// | `save` | insert | untouched |
/// | `update` | write | invalidated |
/// | `delete` | write | invalidated |
pub struct PersonnelRepository {
    /// Authoritative store.
    store: Arc<dyn PersonnelStore>,
    /// Point-lookup cache keyed by identifier.
    cache: ExpiringCache<i64, Personnel>,
}

impl std::fmt::Debug for PersonnelRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonnelRepository")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl PersonnelRepository {
    /// Creates a repository over `store` with the configured cache bounds.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the cache capacity is 0.
    pub fn new(store: Arc<dyn PersonnelStore>, cache: &CacheConfig) -> Result<Self> {
        Ok(Self {
            store,
            cache: ExpiringCache::new("personnel", cache.capacity, cache.expire_after())?,
        })
    }

    /// Returns every stored record, always from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub fn get_all(&self) -> Result<Vec<Personnel>> {
        self.store.list()
    }

    /// Returns a record, from the cache when fresh, otherwise from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub fn get_by_id(&self, id: i64) -> Result<Option<Personnel>> {
        if let Some(record) = self.cache.get(&id) {
            return Ok(Some(record));
        }

        let found = self.store.get(id)?;
        if let Some(record) = &found {
            self.cache.insert(id, record.clone());
        }
        Ok(found)
    }

    /// Inserts a record and returns it with its generated identifier and
    /// fresh timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if the store insert fails.
    #[instrument(skip(self, record), fields(kind = %record.kind()))]
    pub fn save(&self, record: Personnel) -> Result<Personnel> {
        let stamp = current_timestamp();
        let mut record = record.with_timestamps(stamp, stamp);
        record.id = self.store.insert(&record)?;

        tracing::debug!(id = record.id, "Saved personnel");
        Ok(record)
    }

    /// Replaces the record stored under `id`.
    ///
    /// The creation timestamp of the existing record is kept and the update
    /// timestamp refreshed. Returns `None` if no record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read or write fails.
    #[instrument(skip(self, record))]
    pub fn update(&self, id: i64, record: Personnel) -> Result<Option<Personnel>> {
        let Some(existing) = self.get_by_id(id)? else {
            return Ok(None);
        };

        let mut record = record.with_timestamps(existing.created_at, current_timestamp());
        record.id = id;

        let written = self.store.update(id, &record);
        self.cache.invalidate(&id);

        Ok(written?.then_some(record))
    }

    /// Deletes a record and returns what was removed, or `None` if nothing was.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read or delete fails.
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<Option<Personnel>> {
        let Some(existing) = self.get_by_id(id)? else {
            return Ok(None);
        };

        let deleted = self.store.delete(id);
        self.cache.invalidate(&id);

        Ok(deleted?.then_some(existing))
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerProfile, Position, Specialization};
    use crate::storage::SqliteStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store wrapper counting point reads.
    struct CountingStore {
        inner: SqliteStore,
        gets: AtomicUsize,
    }

    impl PersonnelStore for CountingStore {
        fn insert(&self, record: &Personnel) -> Result<i64> {
            PersonnelStore::insert(&self.inner, record)
        }
        fn get(&self, id: i64) -> Result<Option<Personnel>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            PersonnelStore::get(&self.inner, id)
        }
        fn list(&self) -> Result<Vec<Personnel>> {
            PersonnelStore::list(&self.inner)
        }
        fn update(&self, id: i64, record: &Personnel) -> Result<bool> {
            PersonnelStore::update(&self.inner, id, record)
        }
        fn delete(&self, id: i64) -> Result<bool> {
            PersonnelStore::delete(&self.inner, id)
        }
    }

    fn setup() -> (Arc<CountingStore>, PersonnelRepository) {
        let store = Arc::new(CountingStore {
            inner: SqliteStore::in_memory().unwrap(),
            gets: AtomicUsize::new(0),
        });
        let repo = PersonnelRepository::new(store.clone(), &CacheConfig::default()).unwrap();
        (store, repo)
    }

    fn create_test_player(shirt: i32) -> Personnel {
        Personnel::player(
            0,
            "Rodrigo",
            "Hernández",
            PlayerProfile::new(Position::Midfielder, shirt, 1.91, 82.0),
        )
        .with_country("España")
    }

    #[test]
    fn test_save_assigns_id_and_timestamps() {
        let (_, repo) = setup();
        let saved = repo.save(create_test_player(16)).unwrap();
        assert!(saved.id > 0);
        assert_eq!(saved.created_at, saved.updated_at);
        assert!(saved.created_at > chrono::NaiveDateTime::default());
    }

    #[test]
    fn test_get_by_id_reads_through_once() {
        let (store, repo) = setup();
        let saved = repo.save(create_test_player(16)).unwrap();

        assert_eq!(repo.get_by_id(saved.id).unwrap(), Some(saved.clone()));
        assert_eq!(repo.get_by_id(saved.id).unwrap(), Some(saved));
        assert_eq!(store.gets.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_miss_is_not_cached() {
        let (store, repo) = setup();
        assert!(repo.get_by_id(99).unwrap().is_none());
        assert!(repo.get_by_id(99).unwrap().is_none());
        assert_eq!(store.gets.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_update_invalidates_and_preserves_created_at() {
        let (_, repo) = setup();
        let saved = repo.save(create_test_player(16)).unwrap();
        repo.get_by_id(saved.id).unwrap();

        let changed = Personnel::coach(0, "Rodrigo", "Hernández", Specialization::AssistantCoach)
            .with_country("España");
        let updated = repo.update(saved.id, changed).unwrap().unwrap();
        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.created_at, saved.created_at);
        assert!(updated.updated_at >= saved.updated_at);

        let fetched = repo.get_by_id(saved.id).unwrap().unwrap();
        assert!(!fetched.is_player());
        assert_eq!(fetched, updated);
    }

    #[test]
    fn test_delete_invalidates() {
        let (_, repo) = setup();
        let saved = repo.save(create_test_player(16)).unwrap();
        repo.get_by_id(saved.id).unwrap();

        let removed = repo.delete(saved.id).unwrap().unwrap();
        assert_eq!(removed.id, saved.id);
        assert!(repo.get_by_id(saved.id).unwrap().is_none());
        assert!(repo.delete(saved.id).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_returns_none() {
        let (_, repo) = setup();
        assert!(repo.update(5, create_test_player(3)).unwrap().is_none());
    }

    #[test]
    fn test_get_all_bypasses_cache() {
        let (store, repo) = setup();
        repo.save(create_test_player(1)).unwrap();
        repo.save(create_test_player(2)).unwrap();

        assert_eq!(repo.get_all().unwrap().len(), 2);
        assert_eq!(repo.count().unwrap(), 2);
        assert_eq!(store.gets.load(Ordering::SeqCst), 0);
    }
}
