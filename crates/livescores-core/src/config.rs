// Configuration loading and parsing (config/livescores.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::connection::{RetryPolicy, DEFAULT_CONNECT_TIMEOUT};

/// Name of the configuration file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "livescores.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub events: EventsConfig,
    pub display: DisplayConfig,
}

/// Push-stream target and retry behaviour.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub url: String,
    pub retry_delay: Duration,
    pub max_attempts: Option<u32>,
    /// Bound on one connection attempt, TLS and WebSocket handshakes included.
    pub connect_timeout: Duration,
}

/// Event-submission endpoint.
#[derive(Debug, Clone)]
pub struct EventsConfig {
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_footer")]
    pub footer: String,
}

impl Config {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            delay: self.connection.retry_delay,
            max_attempts: self.connection.max_attempts,
        }
    }
}

// ---------------------------------------------------------------------------
// livescores.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    connection: ConnectionSection,
    #[serde(default)]
    events: EventsSection,
    #[serde(default)]
    display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct ConnectionSection {
    url: String,
    #[serde(default = "default_retry_delay_secs")]
    retry_delay_secs: u64,
    #[serde(default)]
    max_attempts: Option<u32>,
    #[serde(default = "default_connect_timeout_secs")]
    connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct EventsSection {
    #[serde(default = "default_events_url")]
    url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl Default for EventsSection {
    fn default() -> Self {
        EventsSection {
            url: default_events_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            title: default_title(),
            footer: default_footer(),
        }
    }
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT.as_secs()
}

fn default_events_url() -> String {
    "http://localhost:8080/event".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_title() -> String {
    "Live Scores".to_string()
}

fn default_footer() -> String {
    "Live Scores".to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/livescores.toml` relative to `base_dir`.
///
/// This does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        connection: ConnectionConfig {
            url: file.connection.url,
            retry_delay: Duration::from_secs(file.connection.retry_delay_secs),
            max_attempts: file.connection.max_attempts,
            connect_timeout: Duration::from_secs(file.connection.connect_timeout_secs),
        },
        events: EventsConfig {
            url: file.events.url,
            timeout: Duration::from_secs(file.events.timeout_secs),
        },
        display: file.display,
    };

    validate(&config)?;

    Ok(config)
}

/// Create `config/livescores.toml` from `defaults/livescores.toml` when it
/// does not exist yet. Returns the path written, or `None` when the user's
/// copy was already in place. An existing file is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} and no defaults/{CONFIG_FILE} to copy it from in {}; \
                 run from the project root",
                base_dir.display()
            ),
        });
    }

    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;

    Ok(Some(target))
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if let Some(path) = ensure_config_file(&cwd)? {
        info!("Created {} from defaults", path.display());
    }
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = &config.connection.url;
    if !(url.starts_with("ws://") || url.starts_with("wss://")) {
        return Err(ConfigError::ValidationError {
            field: "connection.url".into(),
            message: format!("must start with ws:// or wss://, got {url:?}"),
        });
    }

    if config.connection.retry_delay.is_zero() {
        return Err(ConfigError::ValidationError {
            field: "connection.retry_delay_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.connection.connect_timeout.is_zero() {
        return Err(ConfigError::ValidationError {
            field: "connection.connect_timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.connection.max_attempts == Some(0) {
        return Err(ConfigError::ValidationError {
            field: "connection.max_attempts".into(),
            message: "must be greater than 0 (omit it to retry forever)".into(),
        });
    }

    let events_url = &config.events.url;
    if !(events_url.starts_with("http://") || events_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "events.url".into(),
            message: format!("must start with http:// or https://, got {events_url:?}"),
        });
    }

    if config.events.timeout.is_zero() {
        return Err(ConfigError::ValidationError {
            field: "events.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
