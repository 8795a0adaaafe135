//! Core trait for file codecs.
//!
//! A codec converts between personnel records and one textual format. The
//! shared file pre-conditions live in the provided `read`/`write` methods so
//! implementations only deal with text.

use super::files;
use super::formats::Format;
use crate::Result;
use crate::models::Personnel;
use std::path::Path;

/// Reader/writer pair for one exchange format.
///
/// # Example Implementation
///
/// ```rust,ignore
/// impl PersonnelCodec for TsvCodec {
///     fn format(&self) -> Format { Format::Csv }
///     fn decode(&self, source: &Path, text: &str) -> Result<Vec<Personnel>> { ... }
///     fn encode(&self, records: &[Personnel]) -> Result<String> { ... }
/// }
/// ```
pub trait PersonnelCodec: Send + Sync {
    /// The format handled by this codec.
    fn format(&self) -> Format;

    /// Parses file content. `source` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns a storage error for malformed content or an unknown role.
    fn decode(&self, source: &Path, text: &str) -> Result<Vec<Personnel>>;

    /// Renders records as file content.
    ///
    /// # Errors
    ///
    /// Returns a storage error if rendering fails.
    fn encode(&self, records: &[Personnel]) -> Result<String>;

    /// Reads every record from a file.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file fails the read pre-conditions or
    /// its content cannot be decoded.
    fn read(&self, path: &Path) -> Result<Vec<Personnel>> {
        let text = files::read_checked(path, self.format())?;
        self.decode(path, &text)
    }

    /// Writes records to a file, replacing it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the extension does not match or the file
    /// cannot be written.
    fn write(&self, path: &Path, records: &[Personnel]) -> Result<()> {
        files::prepare_write(path, self.format())?;
        let text = self.encode(records)?;
        files::write_atomic(path, &text)
    }
}
