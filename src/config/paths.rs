use std::path::Path;

fn app_dir() -> std::path::PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("courtside")
}

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    app_dir()
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    app_dir().join("logs").to_string_lossy().to_string()
}

/// Returns the default directory for the SQLite database.
///
/// Prefers the platform data directory (e.g., ~/.local/share on Linux) and
/// falls back to the config directory layout.
pub fn get_data_dir_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("courtside"))
        .unwrap_or_else(|| app_dir().join("data"))
        .to_string_lossy()
        .to_string()
}
