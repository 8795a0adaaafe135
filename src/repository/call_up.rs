//! Call-up repository.

use crate::config::CacheConfig;
use crate::models::{CallUp, Personnel};
use crate::storage::{CallUpStore, ExpiringCache, PersonnelStore};
use crate::{Result, current_timestamp};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;

/// Cache-aside repository for call-ups.
///
/// Player queries resolve identifiers against the personnel store; ids that
/// no longer name a stored player are skipped. A missing call-up yields an
/// empty list.
pub struct CallUpRepository {
    /// Authoritative call-up store.
    store: Arc<dyn CallUpStore>,
    /// Roster used to resolve player identifiers.
    personnel: Arc<dyn PersonnelStore>,
    /// Point-lookup cache keyed by identifier.
    cache: ExpiringCache<i64, CallUp>,
}

impl std::fmt::Debug for CallUpRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallUpRepository")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl CallUpRepository {
    /// Creates a repository.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the cache capacity is 0.
    pub fn new(
        store: Arc<dyn CallUpStore>,
        personnel: Arc<dyn PersonnelStore>,
        cache: &CacheConfig,
    ) -> Result<Self> {
        Ok(Self {
            store,
            personnel,
            cache: ExpiringCache::new("call_ups", cache.capacity, cache.expire_after())?,
        })
    }

    /// Returns every call-up, always from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub fn get_all(&self) -> Result<Vec<CallUp>> {
        self.store.list()
    }

    /// Returns a call-up, from the cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub fn get_by_id(&self, id: i64) -> Result<Option<CallUp>> {
        if let Some(call_up) = self.cache.get(&id) {
            return Ok(Some(call_up));
        }

        let found = self.store.get(id)?;
        if let Some(call_up) = &found {
            self.cache.insert(id, call_up.clone());
        }
        Ok(found)
    }

    /// Returns the call-ups of one team.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub fn get_by_team(&self, team_id: i64) -> Result<Vec<CallUp>> {
        self.store.list_by_team(team_id)
    }

    /// Inserts a new call-up, or updates it when it already has an identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    #[instrument(skip(self, call_up), fields(id = call_up.id))]
    pub fn save(&self, call_up: CallUp) -> Result<CallUp> {
        if call_up.id > 0 {
            let id = call_up.id;
            if let Some(updated) = self.update(id, call_up.clone())? {
                return Ok(updated);
            }
            tracing::debug!(id, "Call-up not found, inserting a new one");
        }

        let stamp = current_timestamp();
        let mut call_up = call_up;
        call_up.created_at = stamp;
        call_up.updated_at = stamp;
        call_up.id = self.store.insert(&call_up)?;
        Ok(call_up)
    }

    /// Replaces a call-up and its player links. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read or write fails.
    #[instrument(skip(self, call_up))]
    pub fn update(&self, id: i64, call_up: CallUp) -> Result<Option<CallUp>> {
        let Some(existing) = self.get_by_id(id)? else {
            return Ok(None);
        };

        let mut call_up = call_up.with_id(id);
        call_up.created_at = existing.created_at;
        call_up.updated_at = current_timestamp();

        let written = self.store.update(id, &call_up);
        self.cache.invalidate(&id);

        Ok(written?.then_some(call_up))
    }

    /// Deletes a call-up and returns it, or `None` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read or delete fails.
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<Option<CallUp>> {
        let Some(existing) = self.get_by_id(id)? else {
            return Ok(None);
        };

        let deleted = self.store.delete(id);
        self.cache.invalidate(&id);

        Ok(deleted?.then_some(existing))
    }

    fn resolve_players(&self, ids: &[i64]) -> Result<Vec<Personnel>> {
        let mut players = Vec::with_capacity(ids.len());
        for id in ids {
            match self.personnel.get(*id)? {
                Some(player) if player.is_player() => players.push(player),
                _ => tracing::debug!(player = id, "Skipping unknown player in call-up"),
            }
        }
        Ok(players)
    }

    /// Players called up for a match.
    ///
    /// # Errors
    ///
    /// Returns an error if a store query fails.
    pub fn called_up_players(&self, id: i64) -> Result<Vec<Personnel>> {
        match self.get_by_id(id)? {
            Some(call_up) => self.resolve_players(&call_up.called_up),
            None => Ok(Vec::new()),
        }
    }

    /// Players in the starting eleven.
    ///
    /// # Errors
    ///
    /// Returns an error if a store query fails.
    pub fn starters(&self, id: i64) -> Result<Vec<Personnel>> {
        match self.get_by_id(id)? {
            Some(call_up) => self.resolve_players(&call_up.starters),
            None => Ok(Vec::new()),
        }
    }

    /// Called-up players who do not start.
    ///
    /// # Errors
    ///
    /// Returns an error if a store query fails.
    pub fn substitutes(&self, id: i64) -> Result<Vec<Personnel>> {
        match self.get_by_id(id)? {
            Some(call_up) => self.resolve_players(&call_up.substitutes()),
            None => Ok(Vec::new()),
        }
    }

    /// Players of the roster left out of the call-up.
    ///
    /// # Errors
    ///
    /// Returns an error if a store query fails.
    pub fn not_called_up(&self, id: i64) -> Result<Vec<Personnel>> {
        let Some(call_up) = self.get_by_id(id)? else {
            return Ok(Vec::new());
        };
        let called: HashSet<i64> = call_up.called_up.iter().copied().collect();

        Ok(self
            .personnel
            .list()?
            .into_iter()
            .filter(|p| p.is_player() && !called.contains(&p.id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerProfile, Position, Specialization};
    use crate::storage::SqliteStore;
    use chrono::NaiveDate;

    fn setup() -> (Arc<SqliteStore>, CallUpRepository) {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let repo =
            CallUpRepository::new(store.clone(), store.clone(), &CacheConfig::default()).unwrap();
        (store, repo)
    }

    fn add_player(store: &SqliteStore, shirt: i32) -> i64 {
        let player = Personnel::player(
            0,
            "Jugador",
            format!("Número {shirt}"),
            PlayerProfile::new(Position::Defender, shirt, 1.8, 75.0),
        );
        PersonnelStore::insert(store, &player).unwrap()
    }

    fn create_test_call_up(called: Vec<i64>, starters: Vec<i64>) -> CallUp {
        CallUp::new(
            NaiveDate::from_ymd_opt(2031, 3, 2).unwrap(),
            "Jornada 27",
            1,
            1,
        )
        .with_players(called, starters)
    }

    #[test]
    fn test_save_inserts_then_updates() {
        let (_, repo) = setup();
        let saved = repo.save(create_test_call_up(vec![1, 2, 3], vec![1])).unwrap();
        assert!(saved.id > 0);

        let mut changed = saved.clone();
        changed.description = "Jornada 28".to_string();
        let resaved = repo.save(changed).unwrap();
        assert_eq!(resaved.id, saved.id);
        assert_eq!(resaved.created_at, saved.created_at);
        assert_eq!(repo.get_all().unwrap().len(), 1);
        assert_eq!(
            repo.get_by_id(saved.id).unwrap().unwrap().description,
            "Jornada 28"
        );
    }

    #[test]
    fn test_update_invalidates_links() {
        let (_, repo) = setup();
        let saved = repo.save(create_test_call_up(vec![1, 2, 3], vec![1])).unwrap();
        repo.get_by_id(saved.id).unwrap();

        repo.update(saved.id, create_test_call_up(vec![4, 5], vec![5]))
            .unwrap()
            .unwrap();
        let fetched = repo.get_by_id(saved.id).unwrap().unwrap();
        assert_eq!(fetched.called_up, vec![4, 5]);
        assert_eq!(fetched.starters, vec![5]);
    }

    #[test]
    fn test_player_queries() {
        let (store, repo) = setup();
        let ids: Vec<i64> = (1..=4).map(|shirt| add_player(&store, shirt)).collect();
        let coach = Personnel::coach(0, "Míster", "García", Specialization::HeadCoach);
        PersonnelStore::insert(store.as_ref(), &coach).unwrap();

        let saved = repo
            .save(create_test_call_up(vec![ids[0], ids[1], ids[2]], vec![ids[0]]))
            .unwrap();

        let called: Vec<i64> = repo
            .called_up_players(saved.id)
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(called, vec![ids[0], ids[1], ids[2]]);

        let starters: Vec<i64> = repo.starters(saved.id).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(starters, vec![ids[0]]);

        let subs: Vec<i64> = repo.substitutes(saved.id).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(subs, vec![ids[1], ids[2]]);

        // Coaches are not part of the roster left out
        let left_out: Vec<i64> = repo
            .not_called_up(saved.id)
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(left_out, vec![ids[3]]);

        assert!(repo.called_up_players(999).unwrap().is_empty());
    }

    #[test]
    fn test_get_by_team_and_delete() {
        let (_, repo) = setup();
        let saved = repo.save(create_test_call_up(vec![1], vec![])).unwrap();
        assert_eq!(repo.get_by_team(1).unwrap().len(), 1);
        assert!(repo.get_by_team(2).unwrap().is_empty());

        assert!(repo.delete(saved.id).unwrap().is_some());
        assert!(repo.get_by_id(saved.id).unwrap().is_none());
        assert!(repo.delete(saved.id).unwrap().is_none());
    }
}
