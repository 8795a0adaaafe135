//! Typed field parsing shared by the codecs.
//!
//! Every failure becomes an [`Error::Storage`] naming the file, the record
//! and the offending field.

use crate::models::{Position, RecordKind, Specialization};
use crate::{Error, Result, current_timestamp};
use chrono::NaiveDate;
use std::path::Path;

/// Dates in every exchange format use ISO `yyyy-MM-dd`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses the fields of one record.
pub struct FieldParser<'a> {
    source: &'a Path,
    record: usize,
}

impl<'a> FieldParser<'a> {
    /// Creates a parser for the `record`-th record (1-based) of `source`.
    #[must_use]
    pub const fn new(source: &'a Path, record: usize) -> Self {
        Self { source, record }
    }

    /// Builds a storage error for this record.
    #[must_use]
    pub fn error(&self, detail: impl std::fmt::Display) -> Error {
        Error::Storage(format!(
            "{}: record {}: {detail}",
            self.source.display(),
            self.record
        ))
    }

    /// Parses a required integer.
    ///
    /// # Errors
    ///
    /// Fails if the value is blank or not an integer.
    pub fn int(&self, field: &str, value: &str) -> Result<i64> {
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| self.error(format!("{field} '{value}' is not an integer")))
    }

    /// Parses a required 32-bit integer.
    ///
    /// # Errors
    ///
    /// Fails if the value is blank, not an integer or out of range.
    pub fn int32(&self, field: &str, value: &str) -> Result<i32> {
        value
            .trim()
            .parse::<i32>()
            .map_err(|_| self.error(format!("{field} '{value}' is not an integer")))
    }

    /// Parses an integer, treating a blank value as zero.
    ///
    /// # Errors
    ///
    /// Fails if a non-blank value is not an integer.
    pub fn int_or_zero(&self, field: &str, value: &str) -> Result<i64> {
        if value.trim().is_empty() {
            Ok(0)
        } else {
            self.int(field, value)
        }
    }

    /// Parses a 32-bit integer, treating a blank value as zero.
    ///
    /// # Errors
    ///
    /// Fails if a non-blank value is not an integer.
    pub fn int32_or_zero(&self, field: &str, value: &str) -> Result<i32> {
        if value.trim().is_empty() {
            Ok(0)
        } else {
            self.int32(field, value)
        }
    }

    /// Parses a required decimal number.
    ///
    /// # Errors
    ///
    /// Fails if the value is blank or not a finite number.
    pub fn float(&self, field: &str, value: &str) -> Result<f64> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.error(format!("{field} '{value}' is not a number")))
    }

    /// Parses a decimal number, treating a blank value as zero.
    ///
    /// # Errors
    ///
    /// Fails if a non-blank value is not a finite number.
    pub fn float_or_zero(&self, field: &str, value: &str) -> Result<f64> {
        if value.trim().is_empty() {
            Ok(0.0)
        } else {
            self.float(field, value)
        }
    }

    /// Parses an ISO date.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a `yyyy-MM-dd` date.
    pub fn date(&self, field: &str, value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .map_err(|e| self.error(format!("{field} '{value}' is not a yyyy-MM-dd date: {e}")))
    }

    /// Parses an ISO date, falling back to today when the value is blank.
    ///
    /// # Errors
    ///
    /// Fails if a non-blank value is not a `yyyy-MM-dd` date.
    pub fn date_or_today(&self, field: &str, value: &str) -> Result<NaiveDate> {
        if value.trim().is_empty() {
            tracing::warn!(
                source = %self.source.display(),
                record = self.record,
                field,
                "missing date, using today"
            );
            Ok(current_timestamp().date())
        } else {
            self.date(field, value)
        }
    }

    /// Parses the role discriminator.
    ///
    /// # Errors
    ///
    /// Fails for anything other than `Jugador` or `Entrenador`.
    pub fn kind(&self, value: &str) -> Result<RecordKind> {
        RecordKind::from_discriminator(value)
            .ok_or_else(|| self.error(format!("unrecognized role '{value}'")))
    }

    /// Parses a playing position.
    ///
    /// # Errors
    ///
    /// Fails for an unknown or blank position.
    pub fn position(&self, value: &str) -> Result<Position> {
        Position::parse(value).ok_or_else(|| self.error(format!("unknown position '{value}'")))
    }

    /// Parses a specialization; a blank value means head coach.
    ///
    /// # Errors
    ///
    /// Fails for a non-blank unknown specialization.
    pub fn specialization(&self, value: &str) -> Result<Specialization> {
        if value.trim().is_empty() {
            return Ok(Specialization::default());
        }
        Specialization::parse(value)
            .ok_or_else(|| self.error(format!("unknown specialization '{value}'")))
    }
}

/// Formats a date for exchange files.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
