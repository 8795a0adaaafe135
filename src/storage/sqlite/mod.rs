//! Shared `SQLite` infrastructure for the relational store.
//!
//! - [`connection`]: lock acquisition with poison recovery, pragmas, transactions
//! - [`personnel_row`]: row conversion for [`Personnel`](crate::models::Personnel)
//! - [`metrics`]: operation metrics recording

mod connection;
mod metrics;
mod personnel_row;

pub use connection::{acquire_lock, configure_connection, db_error, with_transaction};
pub use metrics::record_operation_metrics;
pub use personnel_row::{PERSONNEL_SELECT, PersonnelRow, build_personnel_from_row};
