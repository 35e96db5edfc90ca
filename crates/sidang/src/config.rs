//! Configuration management for sidang.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "sidang";

/// Default session database file name.
const DATABASE_FILE_NAME: &str = "session.db";

/// Production backend.
pub const DEFAULT_BASE_URL: &str = "https://simpensi-api.afif.dev/";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SIDANG_`)
/// 2. TOML config file at `~/.config/sidang/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Session storage configuration.
    pub session: SessionConfig,
    /// Sign-in configuration.
    pub auth: AuthConfig,
    /// Presentation configuration.
    pub display: DisplayConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto.
    pub base_url: String,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    pub read_timeout_secs: u64,
    /// Write timeout in seconds.
    pub write_timeout_secs: u64,
}

/// Session storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path to the session database.
    /// Defaults to `~/.local/share/sidang/session.db`
    pub database_path: Option<PathBuf>,
}

/// Sign-in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Google OAuth client the ID tokens are issued for.
    pub google_client_id: String,
    /// E-mail fragments that mark an advisor account (case-insensitive).
    pub dosen_email_markers: Vec<String>,
}

/// Presentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per page in paginated lists.
    pub items_per_page: usize,
    /// Rows shown in each dashboard section.
    pub dashboard_preview: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 30,
            read_timeout_secs: 30,
            write_timeout_secs: 30,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            google_client_id:
                "191478654932-24j21jk2pmtnvk42e7qrbt1c2ufoifnd.apps.googleusercontent.com"
                    .to_string(),
            dosen_email_markers: vec!["dosen".to_string()],
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            items_per_page: 15,
            dashboard_preview: 5,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("SIDANG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.api.base_url).map_err(|e| Error::ConfigValidation {
            message: format!("invalid base_url ({}): {e}", self.api.base_url),
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::ConfigValidation {
                message: format!("base_url cannot be a base: {}", self.api.base_url),
            });
        }

        for (name, value) in [
            ("connect_timeout_secs", self.api.connect_timeout_secs),
            ("read_timeout_secs", self.api.read_timeout_secs),
            ("write_timeout_secs", self.api.write_timeout_secs),
        ] {
            if value == 0 {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be greater than 0"),
                });
            }
        }

        if self.display.items_per_page == 0 {
            return Err(Error::ConfigValidation {
                message: "items_per_page must be greater than 0".to_string(),
            });
        }

        if self.auth.dosen_email_markers.iter().any(String::is_empty) {
            return Err(Error::ConfigValidation {
                message: "dosen_email_markers must not contain empty entries".to_string(),
            });
        }

        Ok(())
    }

    /// Base URL with a guaranteed trailing slash, so relative endpoint
    /// paths join under it instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL does not parse.
    pub fn base_url(&self) -> Result<Url> {
        let raw = &self.api.base_url;
        if raw.ends_with('/') {
            Ok(Url::parse(raw)?)
        } else {
            Ok(Url::parse(&format!("{raw}/"))?)
        }
    }

    /// Get the session database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.session
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Connection timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.api.connect_timeout_secs)
    }

    /// Read timeout.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.api.read_timeout_secs)
    }

    /// Budget for a whole exchange once connected: sending the body plus
    /// reading the response.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.api
                .write_timeout_secs
                .saturating_add(self.api.read_timeout_secs),
        )
    }
}
