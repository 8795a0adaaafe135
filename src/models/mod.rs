//! Data models for clubroster.
//!
//! Personnel records (players and coaches) and match call-ups.

mod call_up;
mod personnel;

pub use call_up::{CallUp, has_duplicates};
pub use personnel::{CoachProfile, Personnel, PlayerProfile, Position, Role, Specialization};

use std::fmt;

/// Runtime kind of a record, used to select its validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Rules shared by every personnel record.
    Personnel,
    /// A player.
    Player,
    /// A coach.
    Coach,
    /// A match call-up.
    CallUp,
}

impl RecordKind {
    /// Returns all kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Personnel, Self::Player, Self::Coach, Self::CallUp]
    }

    /// Returns the kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Personnel => "personnel",
            Self::Player => "player",
            Self::Coach => "coach",
            Self::CallUp => "call-up",
        }
    }

    /// Parses the role discriminator used in exchange files.
    ///
    /// Only `Jugador` and `Entrenador` are recognized (case-insensitive).
    #[must_use]
    pub fn from_discriminator(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Role::PLAYER_TAG) {
            Some(Self::Player)
        } else if s.eq_ignore_ascii_case(Role::COACH_TAG) {
            Some(Self::Coach)
        } else {
            None
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
