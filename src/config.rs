//! Configuration file support.
//!
//! The service is configured once at startup from a JSON file, optionally
//! overridden from the command line. Nothing here is reloaded at runtime.
//!
//! ```json
//! {
//!   "version": 1,
//!   "bind": "127.0.0.1:8001",
//!   "template": "templates/app.html",
//!   "source": { "mode": "scan", "root": "data" },
//!   "auth": { "username": "reviewer", "password": "secret" }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ANNOTATIONS_DIR, DEFAULT_AUTH_REALM, DEFAULT_BIND, DEFAULT_TEMPLATE};
use crate::gallery::GallerySource;
use crate::model::{Category, ClassMap, default_categories};
use crate::render::TemplateSyntax;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Get all log levels in order from least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Parse a level name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|level| level.name().eq_ignore_ascii_case(name))
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Credentials for the optional basic auth gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    /// Realm sent in the `WWW-Authenticate` challenge
    #[serde(default = "default_realm")]
    pub realm: String,
}

fn default_realm() -> String {
    DEFAULT_AUTH_REALM.to_string()
}

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Page template path
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Placeholder syntax of the template
    #[serde(default)]
    pub template_syntax: TemplateSyntax,

    /// Directory receiving exported CSV files
    #[serde(default = "default_annotations_dir")]
    pub annotations_dir: PathBuf,

    /// Where gallery entries come from
    pub source: GallerySource,

    /// Class id to label mapping
    #[serde(default = "default_categories")]
    pub classes: Vec<Category>,

    /// Basic auth credentials; no gate when absent
    #[serde(default)]
    pub auth: Option<AuthConfig>,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_template() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE)
}

fn default_annotations_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ANNOTATIONS_DIR)
}

impl AppConfig {
    /// Create a configuration with default values for the given source.
    pub fn new(source: GallerySource) -> Self {
        Self {
            version: CONFIG_VERSION,
            bind: default_bind(),
            template: default_template(),
            template_syntax: TemplateSyntax::default(),
            annotations_dir: default_annotations_dir(),
            source,
            classes: default_categories(),
            auth: None,
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        if let Some(auth) = &config.auth {
            if auth.username.contains(':') {
                return Err(ConfigError::Invalid(
                    "auth username must not contain ':'".to_string(),
                ));
            }
        }

        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Class map built from the configured categories.
    pub fn class_map(&self) -> ClassMap {
        ClassMap::new(self.classes.iter().cloned())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Semantically invalid value
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
