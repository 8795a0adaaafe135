//! Format codecs for import/export.
//!
//! Each format implements [`PersonnelCodec`]. The three codecs are independent:
//! every format flattens the player/coach sum type its own way and tolerates
//! different kinds of malformed input.

pub mod csv;
pub mod fields;
pub mod json;
pub mod xml;

use super::traits::PersonnelCodec;
use crate::{Error, Result};
use std::path::Path;
use std::str::FromStr;

/// Supported file formats for import/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Comma-separated values with a fixed 15-column header.
    Csv,
    /// JSON array of flat objects.
    Json,
    /// XML `<equipo>` document of `<personal>` elements.
    Xml,
}

impl Format {
    /// Returns all formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Xml]
    }

    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Detects format from file extension.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the extension is missing or not recognized.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            Some("xml") => Ok(Self::Xml),
            Some(ext) => Err(Error::Storage(format!(
                "{}: unsupported file extension .{ext}",
                path.display()
            ))),
            None => Err(Error::Storage(format!(
                "{}: cannot determine format, file has no extension",
                path.display()
            ))),
        }
    }

    /// Returns the codec for this format.
    #[must_use]
    pub fn codec(&self) -> Box<dyn PersonnelCodec> {
        match self {
            Self::Csv => Box::new(csv::CsvCodec),
            Self::Json => Box::new(json::JsonCodec::new()),
            Self::Xml => Box::new(xml::XmlCodec),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(Error::Configuration(format!(
                "no codec registered for format '{s}'"
            ))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Resolves the format to use for `path`.
///
/// An explicit format wins; otherwise the extension decides.
///
/// # Errors
///
/// Returns a storage error if no format is given and the extension is unknown.
pub fn resolve(path: &Path, format: Option<Format>) -> Result<Format> {
    format.map_or_else(|| Format::from_path(path), Ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!(Format::from_str("csv").unwrap(), Format::Csv);
        assert_eq!(Format::from_str("JSON").unwrap(), Format::Json);
        assert_eq!(Format::from_str(" xml ").unwrap(), Format::Xml);
        assert!(matches!(
            Format::from_str("yaml"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            Format::from_path(Path::new("data/personal.JSON")).unwrap(),
            Format::Json
        );
        assert_eq!(
            Format::from_path(Path::new("equipo.xml")).unwrap(),
            Format::Xml
        );
        let err = Format::from_path(Path::new("notes.txt")).unwrap_err();
        assert!(err.is_storage());
        assert!(Format::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_codec_matches_format() {
        for format in Format::all() {
            assert_eq!(format.codec().format(), *format);
        }
    }

    #[test]
    fn test_resolve_prefers_explicit_format() {
        assert_eq!(
            resolve(Path::new("a.csv"), Some(Format::Json)).unwrap(),
            Format::Json
        );
        assert_eq!(resolve(Path::new("a.xml"), None).unwrap(), Format::Xml);
    }
}
