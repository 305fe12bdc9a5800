//! Application-wide constants and configuration values
//!
//! This module centralizes all magic numbers and configuration constants
//! to improve maintainability and make the codebase more configurable.

/// Default upstream API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.balldontlie.io/v1";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Default listen address for the HTTP surface
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// File name of the SQLite database inside the data directory
pub const DATABASE_FILE_NAME: &str = "nba.sqlite3";

/// Default log file name
pub const LOG_FILE_NAME: &str = "courtside.log";

/// Page size requested from paginated upstream endpoints
pub const UPSTREAM_PAGE_SIZE: u32 = 100;

/// Team query resolution
pub mod resolve {
    /// Partial-match scanning stops once this many distinct team ids are collected
    pub const PARTIAL_MATCH_CAP: usize = 8;
}

/// Environment variable names
pub mod env_vars {
    /// Required upstream API key
    pub const API_KEY: &str = "BALLDONTLIE_API_KEY";

    /// Upstream base URL override
    pub const API_BASE: &str = "BALLDONTLIE_BASE";

    /// Directory holding the SQLite database file
    pub const DB_DIR: &str = "DB_DIR";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "COURTSIDE_LOG_FILE";

    /// HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "COURTSIDE_HTTP_TIMEOUT";

    /// Listen address override
    pub const BIND: &str = "COURTSIDE_BIND";
}

/// Retry configuration
pub mod retry {
    /// Total attempts per upstream request, including the first one
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (milliseconds)
    pub const MAX_DELAY_MS: u64 = 4000;
}
