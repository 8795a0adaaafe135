//! Configuration management.
//!
//! Values come from defaults, then an optional TOML file, then `CLUBROSTER_*`
//! environment variables.

use crate::observability::{LogFormat, LoggingConfig};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application name used for platform directories.
const APP_NAME: &str = "clubroster";

/// File name of the relational store inside the data directory.
const DATABASE_FILE: &str = "equipo.db";

/// Main configuration for clubroster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    /// Directory holding the relational store and working files.
    pub data_dir: PathBuf,
    /// Directory for backup exports.
    pub backup_dir: PathBuf,
    /// Path of the relational store.
    pub database_path: PathBuf,
    /// Repository cache bounds.
    pub cache: CacheConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Bounds of the repository point-lookup caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached records.
    pub capacity: usize,
    /// Seconds an entry stays valid after being written.
    pub expire_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            expire_after_secs: 300,
        }
    }
}

impl CacheConfig {
    /// Expiration window as a duration.
    #[must_use]
    pub const fn expire_after(&self) -> Duration {
        Duration::from_secs(self.expire_after_secs)
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Backup directory.
    pub backup_dir: Option<String>,
    /// Relational store path.
    pub database_path: Option<String>,
    /// Cache section.
    pub cache: Option<ConfigFileCache>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Cache section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileCache {
    /// Maximum number of cached records.
    pub capacity: Option<usize>,
    /// Expiration in seconds.
    pub expire_after_secs: Option<u64>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogging {
    /// Level directive.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        let base = directories::ProjectDirs::from("", "", APP_NAME).map_or_else(
            || PathBuf::from(".clubroster"),
            |dirs| dirs.data_dir().to_path_buf(),
        );
        Self::rooted_at(&base)
    }
}

impl RosterConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default layout below `base`: `data/`, `backup/` and `data/equipo.db`.
    #[must_use]
    pub fn rooted_at(base: &Path) -> Self {
        let data_dir = base.join("data");
        Self {
            database_path: data_dir.join(DATABASE_FILE),
            backup_dir: base.join("backup"),
            data_dir,
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed, or
    /// holds invalid values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read config file {}: {e}", path.display()))
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
            Error::Configuration(format!("cannot parse config file {}: {e}", path.display()))
        })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location, or defaults if there is
    /// no config file.
    ///
    /// The default location is `config.toml` in the platform config directory
    /// (`~/.config/clubroster/` on Linux).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a config file exists but is invalid.
    pub fn load_default() -> Result<Self> {
        let Some(dirs) = directories::ProjectDirs::from("", "", APP_NAME) else {
            return Ok(Self::default());
        };

        let path = dirs.config_dir().join("config.toml");
        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading config file");
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Converts a `ConfigFile` to `RosterConfig`.
    ///
    /// A `data_dir` without an explicit `database_path` moves the database
    /// along with it.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config = config.with_data_dir(data_dir);
        }
        if let Some(backup_dir) = file.backup_dir {
            config.backup_dir = PathBuf::from(backup_dir);
        }
        if let Some(database_path) = file.database_path {
            config.database_path = PathBuf::from(database_path);
        }
        if let Some(cache) = file.cache {
            if let Some(capacity) = cache.capacity {
                config.cache.capacity = capacity;
            }
            if let Some(secs) = cache.expire_after_secs {
                config.cache.expire_after_secs = secs;
            }
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                config.logging.level = level;
            }
            if let Some(format) = logging.format {
                config.logging.format = parse_log_format(&format)?;
            }
            config.logging.file = logging.file.map(PathBuf::from);
        }

        config.validate()?;
        Ok(config)
    }

    /// Applies `CLUBROSTER_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a numeric variable does not parse or
    /// the resulting cache capacity is 0.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(data_dir) = lookup("CLUBROSTER_DATA_DIR") {
            self = self.with_data_dir(data_dir);
        }
        if let Some(backup_dir) = lookup("CLUBROSTER_BACKUP_DIR") {
            self.backup_dir = PathBuf::from(backup_dir);
        }
        if let Some(database) = lookup("CLUBROSTER_DATABASE") {
            self.database_path = PathBuf::from(database);
        }
        if let Some(capacity) = lookup("CLUBROSTER_CACHE_CAPACITY") {
            self.cache.capacity = parse_number("CLUBROSTER_CACHE_CAPACITY", &capacity)?;
        }
        if let Some(secs) = lookup("CLUBROSTER_CACHE_TTL_SECS") {
            self.cache.expire_after_secs = parse_number("CLUBROSTER_CACHE_TTL_SECS", &secs)?;
        }
        if let Some(level) = lookup("CLUBROSTER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CLUBROSTER_LOG_FORMAT") {
            self.logging.format = parse_log_format(&format)?;
        }
        if let Some(file) = lookup("CLUBROSTER_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.cache.capacity == 0 {
            return Err(Error::Configuration(
                "cache capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the data directory; the database follows unless set explicitly later.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self.database_path = self.data_dir.join(DATABASE_FILE);
        self
    }

    /// Sets the backup directory.
    #[must_use]
    pub fn with_backup_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_dir = path.into();
        self
    }

    /// Sets the relational store path.
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Sets the cache bounds.
    #[must_use]
    pub const fn with_cache(mut self, capacity: usize, expire_after: Duration) -> Self {
        self.cache = CacheConfig {
            capacity,
            expire_after_secs: expire_after.as_secs(),
        };
        self
    }

    /// Sets the logging configuration.
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| {
            Error::Configuration(format!("{key} must be a non-negative integer, got '{value}'"))
        })
}

fn parse_log_format(value: &str) -> Result<LogFormat> {
    LogFormat::parse(value)
        .ok_or_else(|| Error::Configuration(format!("unknown log format '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RosterConfig::rooted_at(Path::new("/srv/club"));
        assert_eq!(config.data_dir, PathBuf::from("/srv/club/data"));
        assert_eq!(config.backup_dir, PathBuf::from("/srv/club/backup"));
        assert_eq!(config.database_path, PathBuf::from("/srv/club/data/equipo.db"));
        assert_eq!(config.cache.capacity, 5);
        assert_eq!(config.cache.expire_after(), Duration::from_secs(300));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/var/lib/club"

[cache]
capacity = 50

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = RosterConfig::load_from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/club"));
        assert_eq!(config.database_path, PathBuf::from("/var/lib/club/equipo.db"));
        assert_eq!(config.cache.capacity, 50);
        assert_eq!(config.cache.expire_after_secs, 300);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_file_rejects_zero_capacity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cache]\ncapacity = 0\n").unwrap();

        let err = RosterConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RosterConfig::load_from_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_env_overrides() {
        let config = RosterConfig::rooted_at(Path::new("/srv/club"))
            .with_overrides(env(&[
                ("CLUBROSTER_DATABASE", "/tmp/club.db"),
                ("CLUBROSTER_CACHE_CAPACITY", "12"),
                ("CLUBROSTER_CACHE_TTL_SECS", "30"),
                ("CLUBROSTER_LOG_LEVEL", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/club.db"));
        assert_eq!(config.cache.capacity, 12);
        assert_eq!(config.cache.expire_after(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_invalid_number() {
        let err = RosterConfig::default()
            .with_overrides(env(&[("CLUBROSTER_CACHE_TTL_SECS", "cinco")]))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = RosterConfig::default()
            .with_overrides(env(&[("CLUBROSTER_CACHE_CAPACITY", "0")]))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_builders() {
        let config = RosterConfig::rooted_at(Path::new("/a"))
            .with_data_dir("/b")
            .with_backup_dir("/c")
            .with_cache(9, Duration::from_secs(1));
        assert_eq!(config.database_path, PathBuf::from("/b/equipo.db"));
        assert_eq!(config.backup_dir, PathBuf::from("/c"));
        assert_eq!(config.cache.capacity, 9);

        let config = config.with_database_path("/d/x.db");
        assert_eq!(config.database_path, PathBuf::from("/d/x.db"));

        let logging = config.logging.clone().verbose(true);
        let config = config.with_logging(logging);
        assert_eq!(config.logging.level, "debug");
    }
}
