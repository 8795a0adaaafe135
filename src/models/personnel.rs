//! Personnel records: the shared attributes plus the player/coach variants.

use super::RecordKind;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Playing position of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Goalkeeper.
    Goalkeeper,
    /// Defender.
    Defender,
    /// Midfielder.
    Midfielder,
    /// Forward.
    Forward,
}

impl Position {
    /// Returns all positions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Goalkeeper,
            Self::Defender,
            Self::Midfielder,
            Self::Forward,
        ]
    }

    /// Returns the position as it appears in exchange files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "PORTERO",
            Self::Defender => "DEFENSA",
            Self::Midfielder => "CENTROCAMPISTA",
            Self::Forward => "DELANTERO",
        }
    }

    /// Parses a position, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PORTERO" | "GOALKEEPER" => Some(Self::Goalkeeper),
            "DEFENSA" | "DEFENDER" => Some(Self::Defender),
            "CENTROCAMPISTA" | "MIDFIELDER" => Some(Self::Midfielder),
            "DELANTERO" | "FORWARD" => Some(Self::Forward),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coaching specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Specialization {
    /// Head coach.
    #[default]
    HeadCoach,
    /// Assistant coach.
    AssistantCoach,
    /// Goalkeeping coach.
    GoalkeepingCoach,
}

impl Specialization {
    /// Returns all specializations.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::HeadCoach,
            Self::AssistantCoach,
            Self::GoalkeepingCoach,
        ]
    }

    /// Returns the specialization as it appears in exchange files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HeadCoach => "ENTRENADOR_PRINCIPAL",
            Self::AssistantCoach => "ENTRENADOR_ASISTENTE",
            Self::GoalkeepingCoach => "ENTRENADOR_PORTEROS",
        }
    }

    /// Parses a specialization, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ENTRENADOR_PRINCIPAL" | "HEAD_COACH" => Some(Self::HeadCoach),
            "ENTRENADOR_ASISTENTE" | "ASSISTANT_COACH" => Some(Self::AssistantCoach),
            "ENTRENADOR_PORTEROS" | "GOALKEEPING_COACH" => Some(Self::GoalkeepingCoach),
            _ => None,
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes only players carry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProfile {
    /// Playing position.
    pub position: Position,
    /// Shirt number (1-99).
    pub shirt_number: i32,
    /// Height in metres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    /// Goals scored.
    pub goals: i32,
    /// Matches played.
    pub matches_played: i32,
}

impl PlayerProfile {
    /// Creates a profile with zeroed statistics.
    #[must_use]
    pub const fn new(position: Position, shirt_number: i32, height: f64, weight: f64) -> Self {
        Self {
            position,
            shirt_number,
            height,
            weight,
            goals: 0,
            matches_played: 0,
        }
    }

    /// Sets goals and matches played.
    #[must_use]
    pub const fn with_stats(mut self, goals: i32, matches_played: i32) -> Self {
        self.goals = goals;
        self.matches_played = matches_played;
        self
    }
}

/// Attributes only coaches carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoachProfile {
    /// Coaching specialization.
    pub specialization: Specialization,
}

/// Role-specific half of a personnel record.
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    /// A squad player.
    Player(PlayerProfile),
    /// A member of the coaching staff.
    Coach(CoachProfile),
}

impl Role {
    /// Discriminator literal for players in every exchange format.
    pub const PLAYER_TAG: &'static str = "Jugador";
    /// Discriminator literal for coaches in every exchange format.
    pub const COACH_TAG: &'static str = "Entrenador";

    /// Returns the discriminator written to exchange files.
    #[must_use]
    pub const fn discriminator(&self) -> &'static str {
        match self {
            Self::Player(_) => Self::PLAYER_TAG,
            Self::Coach(_) => Self::COACH_TAG,
        }
    }

    /// Returns the record kind of this role.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Player(_) => RecordKind::Player,
            Self::Coach(_) => RecordKind::Coach,
        }
    }
}

/// A member of the club staff, player or coach.
#[derive(Debug, Clone, PartialEq)]
pub struct Personnel {
    /// Store identifier; 0 while unsaved.
    pub id: i64,
    /// Given name.
    pub given_name: String,
    /// Family name.
    pub family_name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Date the person joined the club.
    pub join_date: NaiveDate,
    /// Salary, currency-agnostic.
    pub salary: f64,
    /// Country of origin.
    pub country: String,
    /// When the record was first stored.
    pub created_at: NaiveDateTime,
    /// When the record was last updated.
    pub updated_at: NaiveDateTime,
    /// Image URI or path; empty when there is none.
    pub image_ref: String,
    /// Player or coach attributes.
    pub role: Role,
}

impl Personnel {
    /// Creates a record with default dates, zero salary and no country.
    #[must_use]
    pub fn new(
        id: i64,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            given_name: given_name.into(),
            family_name: family_name.into(),
            birth_date: NaiveDate::default(),
            join_date: NaiveDate::default(),
            salary: 0.0,
            country: String::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
            image_ref: String::new(),
            role,
        }
    }

    /// Creates a player record.
    #[must_use]
    pub fn player(
        id: i64,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        profile: PlayerProfile,
    ) -> Self {
        Self::new(id, given_name, family_name, Role::Player(profile))
    }

    /// Creates a coach record.
    #[must_use]
    pub fn coach(
        id: i64,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        specialization: Specialization,
    ) -> Self {
        Self::new(
            id,
            given_name,
            family_name,
            Role::Coach(CoachProfile { specialization }),
        )
    }

    /// Sets birth and join dates.
    #[must_use]
    pub const fn with_dates(mut self, birth_date: NaiveDate, join_date: NaiveDate) -> Self {
        self.birth_date = birth_date;
        self.join_date = join_date;
        self
    }

    /// Sets the salary.
    #[must_use]
    pub const fn with_salary(mut self, salary: f64) -> Self {
        self.salary = salary;
        self
    }

    /// Sets the country of origin.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }

    /// Sets both timestamps.
    #[must_use]
    pub const fn with_timestamps(
        mut self,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Returns the record kind (player or coach).
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        self.role.kind()
    }

    /// Returns the player attributes, if this is a player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerProfile> {
        match &self.role {
            Role::Player(profile) => Some(profile),
            Role::Coach(_) => None,
        }
    }

    /// Returns the coach attributes, if this is a coach.
    #[must_use]
    pub const fn as_coach(&self) -> Option<&CoachProfile> {
        match &self.role {
            Role::Coach(profile) => Some(profile),
            Role::Player(_) => None,
        }
    }

    /// Returns true for players.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self.role, Role::Player(_))
    }

    /// Returns true for players whose position is goalkeeper.
    #[must_use]
    pub const fn is_goalkeeper(&self) -> bool {
        matches!(
            self.role,
            Role::Player(PlayerProfile {
                position: Position::Goalkeeper,
                ..
            })
        )
    }

    /// Returns "given family".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}
