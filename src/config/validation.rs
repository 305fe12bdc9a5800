use super::Config;
use crate::error::AppError;
use std::net::SocketAddr;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - An API key must be present and non-blank
/// - API base URL must start with http:// or https:// and name a host
/// - HTTP timeout must be greater than zero
/// - Listen address must parse as `host:port`
/// - If a database or log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    config.api_key()?;

    let base = config.api_base_url.trim();
    let host = base
        .strip_prefix("https://")
        .or_else(|| base.strip_prefix("http://"))
        .ok_or_else(|| {
            AppError::config_error("API base URL must start with http:// or https://")
        })?;
    if host.is_empty() || host.starts_with('/') {
        return Err(AppError::config_error("API base URL must include a host"));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be greater than zero",
        ));
    }

    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        AppError::config_error(format!(
            "Invalid listen address '{}': {e}",
            config.bind_address
        ))
    })?;

    if let Some(db_path) = &config.database_path
        && db_path.trim().is_empty()
    {
        return Err(AppError::config_error("Database path cannot be empty"));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
