//! Business-rule validation.
//!
//! Each record kind has a rule object implementing [`Validator`]. The
//! [`ValidatorRegistry`] is a lookup table from [`RecordKind`] to rule object;
//! asking it for a kind nobody registered is a [`Error::Configuration`], not a
//! validation failure.

mod rules;

pub use rules::{CallUpValidator, CoachValidator, PersonnelValidator, PlayerValidator};

use crate::models::{CallUp, Personnel, RecordKind};
use crate::{Error, Result, ViolationClass};
use std::collections::HashMap;
use std::sync::Arc;

/// A record handed to a validator.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// A player or coach.
    Personnel(&'a Personnel),
    /// A match call-up.
    CallUp(&'a CallUp),
}

impl Subject<'_> {
    /// Returns the runtime kind of the record.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Personnel(p) => p.kind(),
            Self::CallUp(_) => RecordKind::CallUp,
        }
    }
}

/// A rule object for one record kind.
pub trait Validator: Send + Sync {
    /// Checks the record, returning the violation found.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a rule violation and
    /// [`Error::Configuration`] when handed a record of the wrong shape.
    fn validate(&self, subject: Subject<'_>) -> Result<()>;
}

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The field that broke the rule.
    pub field: &'static str,
    /// Description of the issue.
    pub message: String,
    /// Classification of the issue.
    pub class: ViolationClass,
}

impl ValidationIssue {
    /// Creates a rule issue.
    #[must_use]
    pub fn rule(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            class: ViolationClass::Rule,
        }
    }

    /// Creates an issue with an explicit class.
    #[must_use]
    pub fn with_class(
        field: &'static str,
        class: ViolationClass,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            message: message.into(),
            class,
        }
    }

    /// Converts this issue into an error.
    #[must_use]
    pub fn into_error(self) -> Error {
        Error::validation(self.class, format!("{}: {}", self.field, self.message))
    }
}

/// Folds a list of issues into a single error.
///
/// The error takes the class of the first issue and lists every message.
pub fn issues_to_result(issues: Vec<ValidationIssue>) -> Result<()> {
    let Some(first) = issues.first() else {
        return Ok(());
    };
    let class = first.class;
    let message = issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(Error::validation(class, message))
}

/// Lookup table from record kind to validator.
#[derive(Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<RecordKind, Arc<dyn Validator>>,
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&'static str> = self.validators.keys().map(RecordKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("ValidatorRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl ValidatorRegistry {
    /// Creates a registry with no validators.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in rules for every kind.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with_validator(RecordKind::Personnel, PersonnelValidator)
            .with_validator(RecordKind::Player, PlayerValidator)
            .with_validator(RecordKind::Coach, CoachValidator)
            .with_validator(RecordKind::CallUp, CallUpValidator::new())
    }

    /// Registers (or replaces) the validator for a kind.
    #[must_use]
    pub fn with_validator(mut self, kind: RecordKind, validator: impl Validator + 'static) -> Self {
        self.validators.insert(kind, Arc::new(validator));
        self
    }

    /// Returns true if a validator is registered for the kind.
    #[must_use]
    pub fn supports(&self, kind: RecordKind) -> bool {
        self.validators.contains_key(&kind)
    }

    /// Returns the validator registered for a kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if none is registered.
    pub fn validator_for(&self, kind: RecordKind) -> Result<&dyn Validator> {
        self.validators
            .get(&kind)
            .map(Arc::as_ref)
            .ok_or_else(|| {
                Error::Configuration(format!("no validator registered for kind '{kind}'"))
            })
    }

    /// Validates a record with the validator for its runtime kind.
    ///
    /// # Errors
    ///
    /// Returns the violation found, or [`Error::Configuration`] if the kind
    /// has no validator.
    pub fn validate(&self, subject: Subject<'_>) -> Result<()> {
        self.validate_as(subject.kind(), subject)
    }

    /// Validates a record with the validator registered for `kind`.
    ///
    /// Useful to apply only the shared personnel rules to a player or coach.
    ///
    /// # Errors
    ///
    /// Same as [`ValidatorRegistry::validate`].
    pub fn validate_as(&self, kind: RecordKind, subject: Subject<'_>) -> Result<()> {
        self.validator_for(kind)?.validate(subject)
    }

    /// Validates a player or coach.
    ///
    /// # Errors
    ///
    /// Same as [`ValidatorRegistry::validate`].
    pub fn validate_personnel(&self, record: &Personnel) -> Result<()> {
        self.validate(Subject::Personnel(record))
    }

    /// Validates a call-up.
    ///
    /// # Errors
    ///
    /// Same as [`ValidatorRegistry::validate`].
    pub fn validate_call_up(&self, call_up: &CallUp) -> Result<()> {
        self.validate(Subject::CallUp(call_up))
    }
}
