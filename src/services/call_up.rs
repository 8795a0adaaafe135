//! Call-up service and roster composition check.

use crate::config::RosterConfig;
use crate::models::{CallUp, Personnel, has_duplicates};
use crate::repository::CallUpRepository;
use crate::storage::{CallUpStore, PersonnelStore};
use crate::validation::ValidatorRegistry;
use crate::{Error, Result, ViolationClass};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::instrument;

const ENTITY: &str = "call-up";

/// Returns the first composition rule a call-up breaks, if any.
///
/// Repeated ids are rejected first. The remaining rules are checked in a fixed
/// order: squad size, goalkeeper count, number of starters, starters among the
/// called-up players.
fn composition_violation(call_up: &CallUp, roster: &HashMap<i64, Personnel>) -> Option<String> {
    if has_duplicates(&call_up.called_up) {
        return Some("called-up players contain a repeated id".to_string());
    }
    if has_duplicates(&call_up.starters) {
        return Some("starters contain a repeated id".to_string());
    }

    if call_up.called_up.len() > CallUp::MAX_CALLED_UP {
        return Some(format!(
            "at most {} players can be called up, got {}",
            CallUp::MAX_CALLED_UP,
            call_up.called_up.len()
        ));
    }

    let goalkeepers = call_up
        .called_up
        .iter()
        .filter(|id| roster.get(*id).is_some_and(Personnel::is_goalkeeper))
        .count();
    if goalkeepers > CallUp::MAX_GOALKEEPERS {
        return Some(format!(
            "at most {} goalkeepers can be called up, got {goalkeepers}",
            CallUp::MAX_GOALKEEPERS
        ));
    }

    if call_up.starters.len() != CallUp::STARTERS {
        return Some(format!(
            "exactly {} starters are required, got {}",
            CallUp::STARTERS,
            call_up.starters.len()
        ));
    }

    let called: HashSet<i64> = call_up.called_up.iter().copied().collect();
    call_up
        .starters
        .iter()
        .find(|id| !called.contains(*id))
        .map(|id| format!("starter {id} is not among the called-up players"))
}

/// Checks the roster composition of a call-up.
///
/// `roster` maps player ids to their records and is only consulted for
/// goalkeeper positions; ids missing from it count as outfield players.
/// Never fails: any broken rule yields `false`.
#[must_use]
pub fn is_valid_call_up(call_up: &CallUp, roster: &HashMap<i64, Personnel>) -> bool {
    composition_violation(call_up, roster).is_none()
}

/// Service for match call-ups.
pub struct CallUpService {
    /// Call-up repository.
    repository: CallUpRepository,
    /// Roster used for composition checks.
    personnel: Arc<dyn PersonnelStore>,
    /// Call-up field rules.
    validators: Arc<ValidatorRegistry>,
}

impl std::fmt::Debug for CallUpService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallUpService")
            .field("repository", &self.repository)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}

impl CallUpService {
    /// Creates a service.
    #[must_use]
    pub fn new(
        repository: CallUpRepository,
        personnel: Arc<dyn PersonnelStore>,
        validators: Arc<ValidatorRegistry>,
    ) -> Self {
        Self {
            repository,
            personnel,
            validators,
        }
    }

    /// Creates a service with the standard rules and the configured cache.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the cache bounds are invalid.
    pub fn with_stores(
        call_ups: Arc<dyn CallUpStore>,
        personnel: Arc<dyn PersonnelStore>,
        config: &RosterConfig,
    ) -> Result<Self> {
        let repository = CallUpRepository::new(call_ups, Arc::clone(&personnel), &config.cache)?;
        Ok(Self::new(
            repository,
            personnel,
            Arc::new(ValidatorRegistry::standard()),
        ))
    }

    /// Returns the underlying repository.
    #[must_use]
    pub const fn repository(&self) -> &CallUpRepository {
        &self.repository
    }

    /// Current players keyed by id.
    fn roster(&self) -> Result<HashMap<i64, Personnel>> {
        Ok(self
            .personnel
            .list()?
            .into_iter()
            .filter(Personnel::is_player)
            .map(|player| (player.id, player))
            .collect())
    }

    /// Checks a call-up against the current roster.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first broken composition rule,
    /// or the store error if the roster cannot be read.
    pub fn validate_composition(&self, call_up: &CallUp) -> Result<()> {
        let roster = self.roster()?;
        composition_violation(call_up, &roster)
            .map_or(Ok(()), |message| Err(Error::validation(ViolationClass::Rule, message)))
    }

    /// Returns true if the stored call-up satisfies the composition rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such call-up.
    pub fn is_complete(&self, id: i64) -> Result<bool> {
        let call_up = self.get_by_id(id)?;
        Ok(is_valid_call_up(&call_up, &self.roster()?))
    }

    /// Returns every call-up.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub fn get_all(&self) -> Result<Vec<CallUp>> {
        self.repository.get_all()
    }

    /// Returns the call-ups of one team.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub fn get_by_team(&self, team_id: i64) -> Result<Vec<CallUp>> {
        self.repository.get_by_team(team_id)
    }

    /// Returns the call-up stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is none.
    pub fn get_by_id(&self, id: i64) -> Result<CallUp> {
        self.repository
            .get_by_id(id)?
            .ok_or(Error::NotFound { entity: ENTITY, id })
    }

    fn check(&self, call_up: &CallUp) -> Result<()> {
        self.validators.validate_call_up(call_up)?;
        self.validate_composition(call_up)
    }

    /// Validates and stores a call-up.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a field or composition rule is broken.
    #[instrument(skip(self, call_up), fields(team = call_up.team_id))]
    pub fn save(&self, call_up: CallUp) -> Result<CallUp> {
        self.check(&call_up)?;
        self.repository.save(call_up)
    }

    /// Validates and replaces the call-up stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a rule is broken, or
    /// [`Error::NotFound`] if there is no such call-up.
    #[instrument(skip(self, call_up))]
    pub fn update(&self, id: i64, call_up: CallUp) -> Result<CallUp> {
        let call_up = call_up.with_id(id);
        self.check(&call_up)?;

        self.repository
            .update(id, call_up)?
            .ok_or(Error::NotFound { entity: ENTITY, id })
    }

    /// Deletes the call-up stored under `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such call-up.
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<CallUp> {
        self.repository
            .delete(id)?
            .ok_or(Error::NotFound { entity: ENTITY, id })
    }
}
