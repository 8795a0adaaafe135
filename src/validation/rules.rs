//! Rule objects for personnel records and call-ups.

use super::{Subject, ValidationIssue, Validator, issues_to_result};
use crate::models::{CallUp, Personnel, PlayerProfile, has_duplicates};
use crate::{Error, Result, ViolationClass};
use chrono::NaiveDate;

fn wrong_shape(validator: &str, subject: Subject<'_>) -> Error {
    Error::Configuration(format!(
        "{validator} validator cannot check a {} record",
        subject.kind()
    ))
}

/// Rules shared by every player and coach.
///
/// Checks run in order and stop at the first violation:
/// identifier not negative, given and family name present, salary positive,
/// country present.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonnelValidator;

impl PersonnelValidator {
    /// Returns the first shared-rule violation, if any.
    #[must_use]
    pub fn first_issue(record: &Personnel) -> Option<ValidationIssue> {
        if record.id < 0 {
            return Some(ValidationIssue::with_class(
                "id",
                ViolationClass::NotFound,
                format!("no personnel can have negative id {}", record.id),
            ));
        }
        if record.given_name.trim().is_empty() {
            return Some(ValidationIssue::with_class(
                "given_name",
                ViolationClass::Storage,
                "given name must not be empty",
            ));
        }
        if record.family_name.trim().is_empty() {
            return Some(ValidationIssue::with_class(
                "family_name",
                ViolationClass::Storage,
                "family name must not be empty",
            ));
        }
        if record.salary.is_nan() || record.salary <= 0.0 {
            return Some(ValidationIssue::rule(
                "salary",
                format!("salary must be greater than zero, got {}", record.salary),
            ));
        }
        if record.country.trim().is_empty() {
            return Some(ValidationIssue::rule("country", "country must not be empty"));
        }
        None
    }
}

impl Validator for PersonnelValidator {
    fn validate(&self, subject: Subject<'_>) -> Result<()> {
        let Subject::Personnel(record) = subject else {
            return Err(wrong_shape("personnel", subject));
        };
        Self::first_issue(record).map_or(Ok(()), |issue| Err(issue.into_error()))
    }
}

/// Shared rules followed by the player-only ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerValidator;

impl PlayerValidator {
    fn first_profile_issue(profile: &PlayerProfile) -> Option<ValidationIssue> {
        if !(1..=99).contains(&profile.shirt_number) {
            return Some(ValidationIssue::rule(
                "shirt_number",
                format!("must be between 1 and 99, got {}", profile.shirt_number),
            ));
        }
        if profile.height.is_nan() || profile.height <= 0.0 {
            return Some(ValidationIssue::rule(
                "height",
                format!("must be greater than 0, got {}", profile.height),
            ));
        }
        if profile.weight.is_nan() || profile.weight <= 0.0 {
            return Some(ValidationIssue::rule(
                "weight",
                format!("must be greater than 0, got {}", profile.weight),
            ));
        }
        if profile.goals < 0 {
            return Some(ValidationIssue::rule(
                "goals",
                format!("must not be negative, got {}", profile.goals),
            ));
        }
        if profile.matches_played < 0 {
            return Some(ValidationIssue::rule(
                "matches_played",
                format!("must not be negative, got {}", profile.matches_played),
            ));
        }
        None
    }
}

impl Validator for PlayerValidator {
    fn validate(&self, subject: Subject<'_>) -> Result<()> {
        let Subject::Personnel(record) = subject else {
            return Err(wrong_shape("player", subject));
        };
        let Some(profile) = record.as_player() else {
            return Err(wrong_shape("player", subject));
        };
        PersonnelValidator::first_issue(record)
            .or_else(|| Self::first_profile_issue(profile))
            .map_or(Ok(()), |issue| Err(issue.into_error()))
    }
}

/// Shared rules only; the specialization is already a closed set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoachValidator;

impl Validator for CoachValidator {
    fn validate(&self, subject: Subject<'_>) -> Result<()> {
        let Subject::Personnel(record) = subject else {
            return Err(wrong_shape("coach", subject));
        };
        if record.as_coach().is_none() {
            return Err(wrong_shape("coach", subject));
        }
        PersonnelValidator::first_issue(record).map_or(Ok(()), |issue| Err(issue.into_error()))
    }
}

/// Call-up rules.
///
/// Every rule is checked and all violations are reported together. The
/// goalkeeper cap needs player positions and is enforced separately by
/// [`crate::services::is_valid_call_up`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CallUpValidator {
    today: Option<NaiveDate>,
}

impl CallUpValidator {
    /// Creates a validator that compares match dates with the local date.
    #[must_use]
    pub const fn new() -> Self {
        Self { today: None }
    }

    /// Creates a validator with a fixed notion of "today".
    #[must_use]
    pub const fn as_of(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Returns every violated rule.
    #[must_use]
    pub fn issues(&self, call_up: &CallUp) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if call_up.id < 0 {
            issues.push(ValidationIssue::with_class(
                "id",
                ViolationClass::NotFound,
                format!("no call-up can have negative id {}", call_up.id),
            ));
        }
        if call_up.description.trim().is_empty() {
            issues.push(ValidationIssue::rule("description", "must not be empty"));
        }
        let today = self.today();
        if call_up.match_date < today {
            issues.push(ValidationIssue::rule(
                "match_date",
                format!("{} is in the past (today is {today})", call_up.match_date),
            ));
        }
        if call_up.team_id <= 0 {
            issues.push(ValidationIssue::rule(
                "team_id",
                format!("must be greater than 0, got {}", call_up.team_id),
            ));
        }
        if call_up.coach_id <= 0 {
            issues.push(ValidationIssue::rule(
                "coach_id",
                format!("must be greater than 0, got {}", call_up.coach_id),
            ));
        }
        if call_up.called_up.len() > CallUp::MAX_CALLED_UP {
            issues.push(ValidationIssue::rule(
                "called_up",
                format!(
                    "at most {} players can be called up, got {}",
                    CallUp::MAX_CALLED_UP,
                    call_up.called_up.len()
                ),
            ));
        }
        if call_up.starters.len() > CallUp::STARTERS {
            issues.push(ValidationIssue::rule(
                "starters",
                format!(
                    "at most {} starters allowed, got {}",
                    CallUp::STARTERS,
                    call_up.starters.len()
                ),
            ));
        }
        if !call_up.starters_are_called_up() {
            issues.push(ValidationIssue::rule(
                "starters",
                "every starter must be among the called-up players",
            ));
        }
        if has_duplicates(&call_up.called_up) {
            issues.push(ValidationIssue::rule("called_up", "contains duplicate player ids"));
        }
        if has_duplicates(&call_up.starters) {
            issues.push(ValidationIssue::rule("starters", "contains duplicate player ids"));
        }

        issues
    }
}

impl Validator for CallUpValidator {
    fn validate(&self, subject: Subject<'_>) -> Result<()> {
        let Subject::CallUp(call_up) = subject else {
            return Err(wrong_shape("call-up", subject));
        };
        issues_to_result(self.issues(call_up))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, Role, Specialization};
    use test_case::test_case;

    fn player(shirt: i32, height: f64, weight: f64, goals: i32, matches: i32) -> Personnel {
        Personnel::player(
            3,
            "Sergio",
            "Ramos",
            PlayerProfile::new(Position::Defender, shirt, height, weight)
                .with_stats(goals, matches),
        )
        .with_salary(90_000.0)
        .with_country("España")
    }

    fn check(validator: &dyn Validator, record: &Personnel) -> Result<()> {
        validator.validate(Subject::Personnel(record))
    }

    #[test]
    fn test_valid_player_passes() {
        assert!(check(&PlayerValidator, &player(4, 1.84, 82.0, 10, 200)).is_ok());
    }

    #[test_case(0, 1.80, 80.0, 0, 0, "shirt_number" ; "shirt number zero")]
    #[test_case(100, 1.80, 80.0, 0, 0, "shirt_number" ; "shirt number above 99")]
    #[test_case(5, 0.0, 80.0, 0, 0, "height" ; "zero height")]
    #[test_case(5, 1.80, -1.0, 0, 0, "weight" ; "negative weight")]
    #[test_case(5, 1.80, 80.0, -1, 0, "goals" ; "negative goals")]
    #[test_case(5, 1.80, 80.0, 0, -3, "matches_played" ; "negative matches")]
    fn test_player_range_rules(
        shirt: i32,
        height: f64,
        weight: f64,
        goals: i32,
        matches: i32,
        field: &str,
    ) {
        let record = player(shirt, height, weight, goals, matches);
        let err = check(&PlayerValidator, &record).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains(field), "{err} should mention {field}");
    }

    #[test]
    fn test_player_rules_short_circuit() {
        // Both the shirt number and the height are wrong; only the first is reported.
        let err = check(&PlayerValidator, &player(0, 0.0, 80.0, 0, 0)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("shirt_number"));
        assert!(!msg.contains("height"));
    }

    #[test]
    fn test_negative_id_is_not_found_class() {
        let mut record = player(4, 1.84, 82.0, 0, 0);
        record.id = -1;
        let err = check(&PlayerValidator, &record).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            Error::Validation {
                class: ViolationClass::NotFound,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_names_are_storage_class() {
        let mut record = player(4, 1.84, 82.0, 0, 0);
        record.given_name = "   ".to_string();
        let err = check(&PersonnelValidator, &record).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                class: ViolationClass::Storage,
                ..
            }
        ));

        record.given_name = "Sergio".to_string();
        record.family_name = String::new();
        let err = check(&PersonnelValidator, &record).unwrap_err();
        assert!(err.to_string().contains("family name"));
    }

    #[test]
    fn test_salary_and_country_rules() {
        let mut record = player(4, 1.84, 82.0, 0, 0).with_salary(-5.0);
        assert!(check(&PersonnelValidator, &record).is_err());

        record.salary = 0.0;
        let err = check(&PersonnelValidator, &record).unwrap_err();
        assert!(err.to_string().contains("salary"), "{err}");

        record.salary = f64::NAN;
        assert!(check(&PersonnelValidator, &record).is_err());

        record.salary = 0.01;
        record.country = String::new();
        let err = check(&PersonnelValidator, &record).unwrap_err();
        assert!(err.to_string().contains("country"));
    }

    #[test]
    fn test_coach_validator() {
        let coach = Personnel::coach(2, "Luis", "Enrique", Specialization::HeadCoach)
            .with_salary(120_000.0)
            .with_country("España");
        assert!(check(&CoachValidator, &coach).is_ok());

        let mut nameless = coach.clone();
        nameless.given_name.clear();
        assert!(check(&CoachValidator, &nameless).is_err());

        let err = check(&CoachValidator, &player(4, 1.84, 82.0, 0, 0)).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_player_validator_rejects_coach_shape() {
        let coach = Personnel::new(
            2,
            "Luis",
            "Enrique",
            Role::Coach(crate::models::CoachProfile::default()),
        );
        assert!(matches!(
            check(&PlayerValidator, &coach),
            Err(Error::Configuration(_))
        ));
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap_or_default()
    }

    fn full_call_up() -> CallUp {
        let called: Vec<i64> = (1..=18).collect();
        let starters: Vec<i64> = (1..=11).collect();
        CallUp::new(today(), "Jornada 20", 1, 50).with_players(called, starters)
    }

    #[test]
    fn test_valid_call_up_passes() {
        let validator = CallUpValidator::as_of(today());
        assert!(validator.validate(Subject::CallUp(&full_call_up())).is_ok());
    }

    #[test]
    fn test_call_up_reports_every_violation() {
        let validator = CallUpValidator::as_of(today());
        let mut call_up = full_call_up();
        call_up.description = String::new();
        call_up.team_id = 0;
        call_up.match_date = NaiveDate::from_ymd_opt(2029, 12, 31).unwrap_or_default();

        let issues = validator.issues(&call_up);
        let fields: Vec<&str> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["description", "match_date", "team_id"]);
    }

    #[test]
    fn test_call_up_player_list_rules() {
        let validator = CallUpValidator::as_of(today());

        let mut too_many = full_call_up();
        too_many.called_up.push(19);
        assert!(validator.validate(Subject::CallUp(&too_many)).is_err());

        let mut stray_starter = full_call_up();
        stray_starter.starters[0] = 99;
        let err = validator
            .validate(Subject::CallUp(&stray_starter))
            .unwrap_err();
        assert!(err.to_string().contains("among the called-up"));

        let mut duplicated = full_call_up();
        duplicated.called_up[17] = 1;
        let err = validator.validate(Subject::CallUp(&duplicated)).unwrap_err();
        assert!(err.to_string().contains("duplicate"));

        let mut twelve = full_call_up();
        twelve.starters.push(12);
        assert!(validator.validate(Subject::CallUp(&twelve)).is_err());
    }

    #[test]
    fn test_call_up_validator_rejects_personnel() {
        let record = player(4, 1.84, 82.0, 0, 0);
        assert!(matches!(
            CallUpValidator::new().validate(Subject::Personnel(&record)),
            Err(Error::Configuration(_))
        ));
    }
}
