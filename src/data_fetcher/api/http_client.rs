//! HTTP client creation and configuration utilities

use crate::error::AppError;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;

/// Creates the upstream HTTP client with connection pooling, a per-request
/// timeout, and the API key attached to every request.
///
/// The upstream expects the raw key in the `Authorization` header, no scheme.
/// Retry for transient failures lives in the fetch function, not here.
pub fn create_http_client_with_timeout(
    timeout_seconds: u64,
    api_key: &str,
) -> Result<Client, AppError> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(api_key)
        .map_err(|e| AppError::config_error(format!("API key is not a valid header value: {e}")))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Creates an HTTP client for testing with default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client_with_timeout(crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS, "test-key")
        .expect("Failed to create test HTTP client")
}
