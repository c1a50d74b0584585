//! Application configuration module
//!
//! `Settings` is built exactly once at startup and then handed to every
//! component that needs it. Values are layered:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file named by `WORKBENCH_CONFIG`
//! 3. Environment variables (a `.env` file is loaded by the binary first)
//!
//! Tests skip the environment entirely and go through [`SettingsBuilder`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an optional TOML settings file
pub const CONFIG_FILE_ENV: &str = "WORKBENCH_CONFIG";

const DEFAULT_DATABASE_URL: &str = "sqlite://manuscript.db";
const DEFAULT_TOKEN_MINUTES: i64 = 30;
const DEFAULT_STORAGE_PATH: &str = "./storage";
const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_CHAT_TURN_TIMEOUT_SECS: u64 = 120;
const DEFAULT_DEMO_TOKEN_DELAY_MS: u64 = 40;
const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_FULL_NAME: &str = "System Administrator";

/// Which blob store backs file content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Local,
}

impl StorageKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Some(StorageKind::Local),
            _ => None,
        }
    }
}

/// Which language-model provider answers chat prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Demo,
}

impl ModelKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "demo" | "fake" => Some(ModelKind::Demo),
            _ => None,
        }
    }
}

/// Fully resolved server settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// SQLite connection string
    pub database_url: String,
    /// HMAC secret used to sign access tokens
    pub secret_key: String,
    /// Lifetime of an access token
    pub access_token_expire_minutes: i64,
    pub storage_backend: StorageKind,
    /// Root directory for the local blob store
    pub storage_path: PathBuf,
    pub model_provider: ModelKind,
    pub server_port: u16,
    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
    /// Largest request body accepted on upload routes
    pub max_upload_bytes: usize,
    /// Upper bound on a single chat turn
    pub chat_turn_timeout_secs: u64,
    /// Pause between streamed fragments of the demo model
    pub demo_token_delay_ms: u64,
    /// bcrypt work factor
    pub password_hash_cost: u32,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_full_name: String,
}

impl Settings {
    /// Create a new SettingsBuilder seeded with defaults
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Load settings from the optional config file and the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, a value
    /// fails to parse, or `SECRET_KEY` is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Settings::builder();
        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            builder = builder.merge_file(&path)?;
        }
        builder.merge_env(|key| std::env::var(key).ok())?.build()
    }

    pub fn chat_turn_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_turn_timeout_secs)
    }

    pub fn demo_token_delay(&self) -> Duration {
        Duration::from_millis(self.demo_token_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidUrl(self.database_url.clone()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::MissingValue("SECRET_KEY"));
        }
        if self.access_token_expire_minutes <= 0 {
            return Err(ConfigError::invalid(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                "must be positive",
            ));
        }
        if self.chat_turn_timeout_secs == 0 {
            return Err(ConfigError::invalid("CHAT_TURN_TIMEOUT_SECS", "must be positive"));
        }
        if !(4..=31).contains(&self.password_hash_cost) {
            return Err(ConfigError::invalid("BCRYPT_COST", "must be between 4 and 31"));
        }
        Ok(())
    }
}

/// Shape of the optional TOML settings file; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    database_url: Option<String>,
    secret_key: Option<String>,
    access_token_expire_minutes: Option<i64>,
    storage_backend: Option<String>,
    storage_path: Option<PathBuf>,
    model_provider: Option<String>,
    server_port: Option<u16>,
    cors_origins: Option<Vec<String>>,
    max_upload_bytes: Option<usize>,
    chat_turn_timeout_secs: Option<u64>,
    demo_token_delay_ms: Option<u64>,
    password_hash_cost: Option<u32>,
    admin_email: Option<String>,
    admin_password: Option<String>,
    admin_full_name: Option<String>,
}

/// Builder for Settings
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    database_url: String,
    secret_key: Option<String>,
    access_token_expire_minutes: i64,
    storage_backend: StorageKind,
    storage_path: PathBuf,
    model_provider: ModelKind,
    server_port: u16,
    cors_origins: Vec<String>,
    max_upload_bytes: usize,
    chat_turn_timeout_secs: u64,
    demo_token_delay_ms: u64,
    password_hash_cost: u32,
    admin_email: String,
    admin_password: String,
    admin_full_name: String,
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            secret_key: None,
            access_token_expire_minutes: DEFAULT_TOKEN_MINUTES,
            storage_backend: StorageKind::Local,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            model_provider: ModelKind::Demo,
            server_port: DEFAULT_SERVER_PORT,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            chat_turn_timeout_secs: DEFAULT_CHAT_TURN_TIMEOUT_SECS,
            demo_token_delay_ms: DEFAULT_DEMO_TOKEN_DELAY_MS,
            password_hash_cost: bcrypt::DEFAULT_COST,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            admin_full_name: DEFAULT_ADMIN_FULL_NAME.to_string(),
        }
    }
}

impl SettingsBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    pub fn secret_key(mut self, secret: impl Into<String>) -> Self {
        self.secret_key = Some(secret.into());
        self
    }

    pub fn access_token_expire_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }

    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    pub fn cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn chat_turn_timeout_secs(mut self, secs: u64) -> Self {
        self.chat_turn_timeout_secs = secs;
        self
    }

    pub fn demo_token_delay_ms(mut self, millis: u64) -> Self {
        self.demo_token_delay_ms = millis;
        self
    }

    pub fn password_hash_cost(mut self, cost: u32) -> Self {
        self.password_hash_cost = cost;
        self
    }

    pub fn admin_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin_email = email.into();
        self.admin_password = password.into();
        self
    }

    /// Overlay values from a TOML file on disk
    pub fn merge_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&contents)
    }

    /// Overlay values from a TOML document
    pub fn merge_toml(mut self, contents: &str) -> Result<Self, ConfigError> {
        let file: FileSettings = toml::from_str(contents)?;

        if let Some(v) = file.database_url {
            self.database_url = v;
        }
        if let Some(v) = file.secret_key {
            self.secret_key = Some(v);
        }
        if let Some(v) = file.access_token_expire_minutes {
            self.access_token_expire_minutes = v;
        }
        if let Some(v) = file.storage_backend {
            self.storage_backend = parse_storage_kind(&v)?;
        }
        if let Some(v) = file.storage_path {
            self.storage_path = v;
        }
        if let Some(v) = file.model_provider {
            self.model_provider = parse_model_kind(&v)?;
        }
        if let Some(v) = file.server_port {
            self.server_port = v;
        }
        if let Some(v) = file.cors_origins {
            self.cors_origins = v;
        }
        if let Some(v) = file.max_upload_bytes {
            self.max_upload_bytes = v;
        }
        if let Some(v) = file.chat_turn_timeout_secs {
            self.chat_turn_timeout_secs = v;
        }
        if let Some(v) = file.demo_token_delay_ms {
            self.demo_token_delay_ms = v;
        }
        if let Some(v) = file.password_hash_cost {
            self.password_hash_cost = v;
        }
        if let Some(v) = file.admin_email {
            self.admin_email = v;
        }
        if let Some(v) = file.admin_password {
            self.admin_password = v;
        }
        if let Some(v) = file.admin_full_name {
            self.admin_full_name = v;
        }
        Ok(self)
    }

    /// Overlay values from environment-style key lookups
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = lookup("SECRET_KEY") {
            self.secret_key = Some(v);
        }
        if let Some(v) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.access_token_expire_minutes = parse_number("ACCESS_TOKEN_EXPIRE_MINUTES", &v)?;
        }
        if let Some(v) = lookup("STORAGE_BACKEND") {
            self.storage_backend = parse_storage_kind(&v)?;
        }
        if let Some(v) = lookup("STORAGE_PATH") {
            self.storage_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("MODEL_PROVIDER") {
            self.model_provider = parse_model_kind(&v)?;
        }
        if let Some(v) = lookup("SERVER_PORT") {
            self.server_port = parse_number("SERVER_PORT", &v)?;
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            self.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = parse_number("MAX_UPLOAD_BYTES", &v)?;
        }
        if let Some(v) = lookup("CHAT_TURN_TIMEOUT_SECS") {
            self.chat_turn_timeout_secs = parse_number("CHAT_TURN_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("DEMO_TOKEN_DELAY_MS") {
            self.demo_token_delay_ms = parse_number("DEMO_TOKEN_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("BCRYPT_COST") {
            self.password_hash_cost = parse_number("BCRYPT_COST", &v)?;
        }
        if let Some(v) = lookup("ADMIN_EMAIL") {
            self.admin_email = v;
        }
        if let Some(v) = lookup("ADMIN_PASSWORD") {
            self.admin_password = v;
        }
        if let Some(v) = lookup("ADMIN_FULL_NAME") {
            self.admin_full_name = v;
        }
        Ok(self)
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Settings, ConfigError> {
        let settings = Settings {
            database_url: self.database_url,
            secret_key: self.secret_key.ok_or(ConfigError::MissingValue("SECRET_KEY"))?,
            access_token_expire_minutes: self.access_token_expire_minutes,
            storage_backend: self.storage_backend,
            storage_path: self.storage_path,
            model_provider: self.model_provider,
            server_port: self.server_port,
            cors_origins: self.cors_origins,
            max_upload_bytes: self.max_upload_bytes,
            chat_turn_timeout_secs: self.chat_turn_timeout_secs,
            demo_token_delay_ms: self.demo_token_delay_ms,
            password_hash_cost: self.password_hash_cost,
            admin_email: self.admin_email,
            admin_password: self.admin_password,
            admin_full_name: self.admin_full_name,
        };
        settings.validate()?;
        Ok(settings)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::invalid(key, format!("'{}' is not a valid number", raw)))
}

fn parse_storage_kind(raw: &str) -> Result<StorageKind, ConfigError> {
    StorageKind::from_str(raw)
        .ok_or_else(|| ConfigError::invalid("STORAGE_BACKEND", format!("unsupported backend '{}'", raw)))
}

fn parse_model_kind(raw: &str) -> Result<ModelKind, ConfigError> {
    ModelKind::from_str(raw)
        .ok_or_else(|| ConfigError::invalid("MODEL_PROVIDER", format!("unsupported provider '{}'", raw)))
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            message: message.into(),
        }
    }
}
