//! # Clubroster
//!
//! Personnel and match call-up management for a football club.
//!
//! Clubroster keeps a roster of players and coaches in a relational store and
//! exchanges it with the outside world through three interchangeable file
//! formats (CSV, JSON and XML).
//!
//! ## Features
//!
//! - Player/Coach sum type shared by every codec and validator
//! - Kind-keyed validator registry with per-role business rules
//! - Cache-aside repository with bounded, expiring point-lookup cache
//! - Batch import with partial-failure accounting
//! - Call-up roster composition checks (squad size, goalkeepers, starters)
//!
//! ## Example
//!
//! ```rust,ignore
//! use clubroster::io::Format;
//! use clubroster::services::PersonnelService;
//! use clubroster::storage::SqliteStore;
//!
//! let store = std::sync::Arc::new(SqliteStore::new("equipo.db")?);
//! let service = PersonnelService::with_store(store, &config)?;
//! let result = service.import_from_file("plantilla.csv".as_ref(), Some(Format::Csv))?;
//! println!("{} of {} records imported", result.imported, result.total_processed);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::path::PathBuf;
use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod repository;
pub mod services;
pub mod storage;
pub mod validation;

// Re-exports for convenience
pub use config::RosterConfig;
pub use models::{
    CallUp, CoachProfile, Personnel, PlayerProfile, Position, RecordKind, Role, Specialization,
};
pub use repository::{CallUpRepository, PersonnelRepository};
pub use services::{CallUpService, PersonnelService, is_valid_call_up};
pub use storage::{CallUpStore, PersonnelStore, SqliteStore};
pub use validation::ValidatorRegistry;

/// Class of a business-rule violation.
///
/// A negative identifier is reported as [`ViolationClass::NotFound`] and an
/// empty name as [`ViolationClass::Storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationClass {
    /// Negative identifier.
    NotFound,
    /// Required text field left empty.
    Storage,
    /// Range or composition rule violated.
    Rule,
}

impl ViolationClass {
    /// Returns the class as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::Storage => "storage",
            Self::Rule => "rule",
        }
    }
}

impl fmt::Display for ViolationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for clubroster operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Validation` | Negative id, empty name, shirt number out of range, invalid call-up |
/// | `Storage` | File missing/empty/unreadable, wrong extension, malformed content, unknown role |
/// | `IncompleteRecord` | XML record lacks id, name, position or specialization |
/// | `NotFound` | Public lookup, update or delete found no record |
/// | `Configuration` | No validator registered for a kind, unknown format, bad config file |
/// | `OperationFailed` | `SQLite` statements or transactions fail |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A business rule was violated.
    #[error("validation failed ({class}): {message}")]
    Validation {
        /// Classification of the violation.
        class: ViolationClass,
        /// Human readable description of the first violation found.
        message: String,
    },

    /// A file could not be read, written or parsed.
    ///
    /// The message always names the offending path and, when known, the cause.
    #[error("storage error: {0}")]
    Storage(String),

    /// A markup record is missing a field required to rebuild it.
    #[error("incomplete record #{index} in {}: missing {field}", path.display())]
    IncompleteRecord {
        /// File being read.
        path: PathBuf,
        /// 1-based position of the record in the file.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// No record exists with the given identifier.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Kind of entity looked up.
        entity: &'static str,
        /// Identifier that was looked up.
        id: i64,
    },

    /// Wiring or configuration mistake.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A relational store operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds a validation error.
    pub fn validation(class: ViolationClass, message: impl Into<String>) -> Self {
        Self::Validation {
            class,
            message: message.into(),
        }
    }

    /// Returns true for explicit not-found errors and negative-id violations.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Validation {
                    class: ViolationClass::NotFound,
                    ..
                }
        )
    }

    /// Returns true for file-boundary failures.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::IncompleteRecord { .. })
    }

    /// Returns true for business-rule violations.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type alias for clubroster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Current local time, used to stamp created and updated records.
#[must_use]
pub fn current_timestamp() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
