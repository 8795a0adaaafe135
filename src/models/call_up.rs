//! Match call-ups (squad selection for a single match).

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

/// A squad selected for one match, with its starting eleven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallUp {
    /// Store identifier; 0 while unsaved.
    pub id: i64,
    /// Match date.
    pub match_date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Team the call-up belongs to.
    pub team_id: i64,
    /// Coach responsible for the selection.
    pub coach_id: i64,
    /// Players called up. Order is irrelevant.
    pub called_up: Vec<i64>,
    /// Starting players, a subset of `called_up`.
    pub starters: Vec<i64>,
    /// When the call-up was first stored.
    pub created_at: NaiveDateTime,
    /// When the call-up was last updated.
    pub updated_at: NaiveDateTime,
}

impl CallUp {
    /// Maximum number of called-up players.
    pub const MAX_CALLED_UP: usize = 18;
    /// Exact number of starters in a complete line-up.
    pub const STARTERS: usize = 11;
    /// Maximum number of goalkeepers among the called-up players.
    pub const MAX_GOALKEEPERS: usize = 2;

    /// Creates an unsaved call-up with no players.
    #[must_use]
    pub fn new(
        match_date: NaiveDate,
        description: impl Into<String>,
        team_id: i64,
        coach_id: i64,
    ) -> Self {
        Self {
            id: 0,
            match_date,
            description: description.into(),
            team_id,
            coach_id,
            called_up: Vec::new(),
            starters: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Sets the called-up players and starters.
    #[must_use]
    pub fn with_players(mut self, called_up: Vec<i64>, starters: Vec<i64>) -> Self {
        self.called_up = called_up;
        self.starters = starters;
        self
    }

    /// Returns true if the player was called up.
    #[must_use]
    pub fn is_called_up(&self, player_id: i64) -> bool {
        self.called_up.contains(&player_id)
    }

    /// Returns true if the player starts.
    #[must_use]
    pub fn is_starter(&self, player_id: i64) -> bool {
        self.starters.contains(&player_id)
    }

    /// Called-up players who do not start.
    #[must_use]
    pub fn substitutes(&self) -> Vec<i64> {
        let starters: HashSet<i64> = self.starters.iter().copied().collect();
        self.called_up
            .iter()
            .copied()
            .filter(|id| !starters.contains(id))
            .collect()
    }

    /// Returns true if every starter is also called up.
    #[must_use]
    pub fn starters_are_called_up(&self) -> bool {
        let called: HashSet<i64> = self.called_up.iter().copied().collect();
        self.starters.iter().all(|id| called.contains(id))
    }
}

/// Returns true if `ids` contains the same value twice.
#[must_use]
pub fn has_duplicates(ids: &[i64]) -> bool {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().any(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 3, 14).unwrap_or_default()
    }

    #[test]
    fn test_substitutes_excludes_starters() {
        let call_up = CallUp::new(match_day(), "Derbi", 1, 2)
            .with_players(vec![10, 11, 12, 13], vec![10, 12]);

        assert_eq!(call_up.substitutes(), vec![11, 13]);
        assert!(call_up.is_called_up(13));
        assert!(call_up.is_starter(12));
        assert!(!call_up.is_starter(11));
    }

    #[test]
    fn test_starters_are_called_up() {
        let ok = CallUp::new(match_day(), "Liga", 1, 2).with_players(vec![1, 2, 3], vec![1, 3]);
        assert!(ok.starters_are_called_up());

        let stray = CallUp::new(match_day(), "Liga", 1, 2).with_players(vec![1, 2, 3], vec![4]);
        assert!(!stray.starters_are_called_up());
    }

    #[test]
    fn test_has_duplicates() {
        assert!(!has_duplicates(&[]));
        assert!(!has_duplicates(&[1, 2, 3]));
        assert!(has_duplicates(&[1, 2, 1]));
    }
}
