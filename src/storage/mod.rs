//! Storage layer.
//!
//! - **Traits**: narrow CRUD contracts for personnel and call-ups
//! - **Persistence**: the authoritative `SQLite` store
//! - **Cache**: bounded, expiring point-lookup cache used by the repositories

// Allow significant_drop_tightening - connection guards are held for the whole
// statement sequence of an operation.
#![allow(clippy::significant_drop_tightening)]

pub mod cache;
pub mod persistence;
pub mod sqlite;
pub mod traits;

pub use cache::ExpiringCache;
pub use persistence::SqliteStore;
pub use traits::{CallUpStore, PersonnelStore};
