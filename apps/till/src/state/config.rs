//! # Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                               │
//! │     --backend remote --api-url http://pos.local/api --db ./shop.db      │
//! │                                                                         │
//! │  2. Environment Variables                                               │
//! │     TILL_BACKEND=remote                                                 │
//! │     TILL_API_URL=http://pos.local/api                                   │
//! │                                                                         │
//! │  3. TOML Config File                                                    │
//! │     --config FILE, else                                                 │
//! │     ~/.config/till-pos/till.toml (Linux)                                │
//! │     ~/Library/Application Support/com.till.pos/till.toml (macOS)        │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                    │
//! │     local backend, $ with 2 decimals, UTC+05:00                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! backend = "local"          # local | remote
//! db_path = "/var/lib/till/till.db"
//!
//! [remote]
//! base_url = "https://localhost:7078/api"
//! timeout_secs = 10
//! accept_invalid_certs = false
//!
//! [display]
//! currency_symbol = "$"
//! currency_decimals = 2
//! utc_offset_minutes = 300
//! page_size = 10
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use till_core::{Money, DEFAULT_PAGE_SIZE, PAGE_SIZES};
use till_remote::DEFAULT_BASE_URL;

/// Largest offset a real time zone uses (UTC+14:00).
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Backend
// =============================================================================

/// Where collections are persisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// SQLite blob store on this machine.
    #[default]
    Local,
    /// The store's REST server.
    Remote,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Local => write!(f, "local"),
            Backend::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "sqlite" | "offline" => Ok(Backend::Local),
            "remote" | "rest" | "server" => Ok(Backend::Remote),
            other => Err(ConfigError::Invalid(format!(
                "Unknown backend: '{}'. Valid options: local, remote",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: Backend,

    /// SQLite file for the local backend. Unset means the platform data dir.
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub base_url: String,
    pub timeout_secs: u64,

    /// Trust self-signed certificates (development servers).
    pub accept_invalid_certs: bool,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub currency_symbol: String,

    /// 0, 1 or 2.
    pub currency_decimals: u8,

    /// Offset used when showing timestamps. Stored times stay UTC.
    pub utc_offset_minutes: i32,

    pub page_size: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            utc_offset_minutes: 300,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Flag values that override everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<Backend>,
    pub api_url: Option<String>,
    pub db_path: Option<PathBuf>,
}

// =============================================================================
// TillConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TillConfig {
    pub storage: StorageSettings,
    pub remote: RemoteSettings,
    pub display: DisplaySettings,
}

impl TillConfig {
    /// Loads defaults, then the file, then the environment, then `overrides`.
    ///
    /// An explicit `config_path` must exist. The platform default may be
    /// missing, in which case defaults are used.
    pub fn load(config_path: Option<PathBuf>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        config.validate()?;

        debug!(backend = %config.storage.backend, "Configuration loaded");
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Writes this configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(io_err)?;
        info!(?path, "Config saved");
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Applies `TILL_*` variables. Unparseable values are ignored with a warning.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("TILL_BACKEND") {
            match backend.parse::<Backend>() {
                Ok(backend) => self.storage.backend = backend,
                Err(e) => warn!("Ignoring TILL_BACKEND: {}", e),
            }
        }

        if let Some(url) = lookup("TILL_API_URL") {
            self.remote.base_url = url;
        }

        if let Some(path) = lookup("TILL_DB_PATH") {
            self.storage.db_path = Some(PathBuf::from(path));
        }

        if let Some(timeout) = lookup("TILL_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.remote.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring TILL_TIMEOUT_SECS: not a number"),
            }
        }

        if let Some(symbol) = lookup("TILL_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(backend) = overrides.backend {
            self.storage.backend = backend;
        }
        if let Some(url) = &overrides.api_url {
            self.remote.base_url = url.clone();
        }
        if let Some(path) = &overrides.db_path {
            self.storage.db_path = Some(path.clone());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.storage.backend == Backend::Remote {
            let url = self.remote.base_url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return invalid(format!("remote.base_url must be an http(s) URL, got '{}'", url));
            }
        }
        if self.remote.timeout_secs == 0 {
            return invalid("remote.timeout_secs must be greater than 0".to_string());
        }
        if !PAGE_SIZES.contains(&self.display.page_size) {
            return invalid(format!(
                "display.page_size must be one of {:?}, got {}",
                PAGE_SIZES, self.display.page_size
            ));
        }
        if self.display.currency_decimals > 2 {
            return invalid("display.currency_decimals must be 0, 1 or 2".to_string());
        }
        if self.display.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return invalid(format!(
                "display.utc_offset_minutes must be within ±{}",
                MAX_UTC_OFFSET_MINUTES
            ));
        }
        Ok(())
    }

    /// `till.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "pos")
            .map(|dirs| dirs.config_dir().join("till.toml"))
    }

    /// The SQLite file for the local backend.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.till.pos/till.db`
    /// - **Windows**: `%APPDATA%\till\pos\data\till.db`
    /// - **Linux**: `~/.local/share/pos/till.db`
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.db_path {
            return path.clone();
        }
        directories::ProjectDirs::from("com", "till", "pos")
            .map(|dirs| dirs.data_dir().join("till.db"))
            .unwrap_or_else(|| PathBuf::from("till.db"))
    }

    /// HTTP request timeout, also the wait for a local pool connection.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }

    /// Formats money with the configured symbol and precision.
    ///
    /// ## Examples
    /// ```text
    /// 1099   → "$10.99"
    /// -500   → "-$5.00"
    /// 123456 → "$1234.56"
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        amount.format_with(&self.display.currency_symbol, self.display.currency_decimals)
    }

    /// `MM/DD/YYYY hh:mm:ss AM/PM` in the configured offset.
    pub fn format_timestamp(&self, at: DateTime<Utc>) -> String {
        let offset =
            FixedOffset::east_opt(self.display.utc_offset_minutes * 60).unwrap_or(Utc.fix());
        at.with_timezone(&offset)
            .format("%m/%d/%Y %I:%M:%S %p")
            .to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = TillConfig::default();
        assert_eq!(config.storage.backend, Backend::Local);
        assert_eq!(config.remote.base_url, "https://localhost:7078/api");
        assert_eq!(config.display.utc_offset_minutes, 300);
        assert_eq!(config.display.page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("REMOTE".parse::<Backend>().unwrap(), Backend::Remote);
        assert_eq!("sqlite".parse::<Backend>().unwrap(), Backend::Local);
        assert!("cloud".parse::<Backend>().is_err());
    }

    #[test]
    fn test_file_then_env_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.toml");
        std::fs::write(
            &path,
            r#"
            [storage]
            backend = "remote"

            [remote]
            base_url = "http://file.local/api"
            timeout_secs = 3

            [display]
            currency_symbol = "Rs "
            "#,
        )
        .unwrap();

        let mut config = TillConfig::from_file(&path).unwrap();
        assert_eq!(config.remote.base_url, "http://file.local/api");
        assert_eq!(config.display.page_size, 10);

        config.apply_env_overrides(env(&[
            ("TILL_API_URL", "http://env.local/api"),
            ("TILL_TIMEOUT_SECS", "oops"),
        ]));
        assert_eq!(config.remote.base_url, "http://env.local/api");
        assert_eq!(config.remote.timeout_secs, 3);

        config.apply_overrides(&Overrides {
            backend: Some(Backend::Local),
            api_url: None,
            db_path: Some(PathBuf::from("/tmp/x.db")),
        });
        assert_eq!(config.storage.backend, Backend::Local);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/x.db"));
        assert_eq!(config.remote.base_url, "http://env.local/api");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TillConfig::load(Some(dir.path().join("absent.toml")), &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("till.toml");
        let mut config = TillConfig::default();
        config.display.page_size = 25;
        config.save(&path).unwrap();

        assert_eq!(TillConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_validation() {
        let mut config = TillConfig::default();
        config.storage.backend = Backend::Remote;
        config.remote.base_url = "localhost:7078".into();
        assert!(config.validate().is_err());

        let mut config = TillConfig::default();
        config.display.page_size = 7;
        assert!(config.validate().is_err());

        let mut config = TillConfig::default();
        config.remote.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = TillConfig::default();
        config.display.utc_offset_minutes = -24 * 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_currency() {
        let config = TillConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1099)), "$10.99");
        assert_eq!(config.format_currency(Money::from_cents(123456)), "$1234.56");
    }

    #[test]
    fn test_format_timestamp_uses_offset() {
        let config = TillConfig::default();
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 5).unwrap();
        assert_eq!(config.format_timestamp(at), "03/10/2024 07:30:05 PM");

        let mut utc = TillConfig::default();
        utc.display.utc_offset_minutes = 0;
        assert_eq!(utc.format_timestamp(at), "03/10/2024 02:30:05 PM");
    }
}
