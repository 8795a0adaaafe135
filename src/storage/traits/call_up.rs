//! Call-up store trait.

use crate::Result;
use crate::models::CallUp;

/// Relational store for call-ups and their player links.
pub trait CallUpStore: Send + Sync {
    /// Inserts a call-up with its player links and returns the generated identifier.
    fn insert(&self, call_up: &CallUp) -> Result<i64>;

    /// Retrieves a call-up with its player links.
    fn get(&self, id: i64) -> Result<Option<CallUp>>;

    /// Lists every call-up ordered by identifier.
    fn list(&self) -> Result<Vec<CallUp>>;

    /// Lists the call-ups of one team.
    fn list_by_team(&self, team_id: i64) -> Result<Vec<CallUp>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|c| c.team_id == team_id)
            .collect())
    }

    /// Replaces a call-up and its player links in a single step.
    ///
    /// Returns false if no such call-up exists.
    fn update(&self, id: i64, call_up: &CallUp) -> Result<bool>;

    /// Deletes a call-up and its player links.
    fn delete(&self, id: i64) -> Result<bool>;
}
