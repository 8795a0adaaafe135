//! Import and export service implementations.
//!
//! Orchestrates codec selection, per-record validation and failure accounting.

pub mod export;
pub mod import;

pub use export::{ExportResult, ExportService};
pub use import::{ImportResult, ImportService};
