use crate::constants::{self, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_data_dir_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the service.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the upstream statistics API, including the version segment.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Upstream API key, sent verbatim in the `Authorization` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Path to the SQLite database. Defaults to `nba.sqlite3` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for upstream requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Address the HTTP surface listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// First backoff delay between upstream retries, doubled per attempt.
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
}

fn default_api_base_url() -> String {
    constants::DEFAULT_API_BASE_URL.to_string()
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_bind_address() -> String {
    constants::DEFAULT_BIND_ADDRESS.to_string()
}

fn default_retry_base_delay() -> u64 {
    constants::retry::BASE_DELAY_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            api_key: None,
            database_path: None,
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            bind_address: default_bind_address(),
            retry_base_delay_ms: default_retry_base_delay(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location, falling back
    /// to defaults when no file exists. Environment variables override file values.
    ///
    /// # Environment Variables
    /// - `BALLDONTLIE_API_KEY` - Upstream API key (required unless set in the file)
    /// - `BALLDONTLIE_BASE` - Override upstream base URL
    /// - `DB_DIR` - Directory for the SQLite database file
    /// - `COURTSIDE_LOG_FILE` - Override log file path
    /// - `COURTSIDE_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    /// - `COURTSIDE_BIND` - Override listen address
    ///
    /// # Returns
    /// * `Ok(Config)` - Loaded and validated configuration
    /// * `Err(AppError)` - Unreadable file or failed validation; startup must abort
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(env_vars::API_KEY) {
            self.api_key = Some(api_key);
        }

        if let Ok(base) = std::env::var(env_vars::API_BASE) {
            self.api_base_url = base;
        }

        if let Ok(db_dir) = std::env::var(env_vars::DB_DIR) {
            self.database_path = Some(
                Path::new(&db_dir)
                    .join(constants::DATABASE_FILE_NAME)
                    .to_string_lossy()
                    .to_string(),
            );
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Ok(bind) = std::env::var(env_vars::BIND) {
            self.bind_address = bind;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Returns the API key, or a configuration error naming the variable to set.
    pub fn api_key(&self) -> Result<&str, AppError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(AppError::config_error(format!(
                "Missing required environment variable: {}",
                env_vars::API_KEY
            ))),
        }
    }

    /// Resolved database location: the configured path or the default data directory.
    pub fn database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => Path::new(&get_data_dir_path()).join(constants::DATABASE_FILE_NAME),
        }
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// The API key is masked; only its last four characters are shown.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load_from_path(&config_path).await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("API Base URL:");
            println!("{}", config.api_base_url);
            println!("────────────────────────────────────");
            println!("API Key:");
            println!("{}", mask_secret(config.api_key.as_deref()));
            println!("────────────────────────────────────");
            println!("Database:");
            println!("{}", config.database_path().display());
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            println!("{} seconds", config.http_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Listen Address:");
            println!("{}", config.bind_address);
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/{}", constants::LOG_FILE_NAME);
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path, creating the parent directory
    /// if needed. A trailing slash on the base URL is dropped.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(&Config {
            api_base_url: self.api_base_url.trim_end_matches('/').to_string(),
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides or validation.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        Some(s) if s.chars().count() > 4 => {
            let skip = s.chars().count() - 4;
            let tail: String = s.chars().skip(skip).collect();
            format!("****{tail}")
        }
        Some(s) if !s.is_empty() => "****".to_string(),
        _ => "(not set)".to_string(),
    }
}
