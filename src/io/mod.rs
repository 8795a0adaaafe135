//! File import/export subsystem.
//!
//! Converts the roster to and from exchange files.
//!
//! # Architecture
//!
//! - **Codecs** implement [`PersonnelCodec`], one per [`Format`]
//! - **File checks** in [`files`] enforce existence, extension and atomic writes
//! - **Services** validate decoded records one by one and account for failures
//!
//! # Supported Formats
//!
//! | Format | Extension | Layout |
//! |--------|-----------|--------|
//! | CSV | `.csv` | Fixed 15-column header |
//! | JSON | `.json` | Array of flat objects keyed by `rol` |
//! | XML | `.xml` | `<equipo>` of `<personal>` elements keyed by `tipo` |
//!
//! # Example
//!
//! ```rust,ignore
//! use clubroster::io::{Format, ImportService};
//!
//! let import = ImportService::new(registry);
//! let result = import.import_from_file(path, Some(Format::Xml), |record| {
//!     repo.save(record).map(drop)
//! })?;
//! println!("Imported {} of {}", result.imported, result.total_processed);
//! ```

pub mod files;
pub mod formats;
pub mod services;
pub mod traits;

// Re-exports for convenience
pub use formats::{Format, resolve};
pub use services::export::{ExportResult, ExportService};
pub use services::import::{ImportResult, ImportService};
pub use traits::PersonnelCodec;
