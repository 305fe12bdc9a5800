//! Generic HTTP fetching with bounded retry and status-aware error mapping

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::constants::retry;
use crate::error::AppError;

/// Bounded exponential backoff for transient upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first request
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: retry::MAX_ATTEMPTS,
            base_delay: Duration::from_millis(retry::BASE_DELAY_MS),
            max_delay: Duration::from_millis(retry::MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        RetryPolicy {
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            ..RetryPolicy::default()
        }
    }

    /// Delay before retry number `retry` (0-based), doubling and capped.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// One GET request. Transport failures and non-2xx statuses become `AppError`s.
async fn send_once(client: &Client, url: &str) -> Result<reqwest::Response, AppError> {
    let response = client.get(url).send().await.map_err(|e| {
        error!("Request failed for URL {}: {}", url, e);
        if e.is_timeout() {
            AppError::network_timeout(url)
        } else if e.is_connect() {
            AppError::network_connection(url, e.to_string())
        } else {
            AppError::ApiFetch(e)
        }
    })?;

    let status = response.status();
    debug!("Response status: {status}");
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");
    error!("HTTP {} - {} (URL: {})", status_code, reason, url);

    Err(match status_code {
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    })
}

/// Generic fetch function with retry logic and detailed error mapping.
///
/// This function:
/// - Retries connection failures, timeouts and 5xx responses with exponential backoff
/// - Never retries 4xx responses; they are mapped and returned immediately
/// - Distinguishes empty bodies, non-JSON bodies and unexpected JSON structure
///
/// # Arguments
/// * `client` - HTTP client for making requests
/// * `url` - URL to fetch data from
/// * `policy` - Attempt count and backoff bounds
#[instrument(skip(client, policy))]
pub(super) async fn fetch<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<T, AppError> {
    info!("Fetching data from URL: {url}");

    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;
    let response = loop {
        attempt += 1;
        match send_once(client, url).await {
            Ok(resp) => break resp,
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let wait = policy.delay_for(attempt - 1);
                warn!(
                    "Transient failure for {}: {}. Retrying in {:?} (attempt {}/{})",
                    url, e, wait, attempt, max_attempts
                );
                tokio::time::sleep(wait).await;
            }
            Err(e) => return Err(e),
        }
    };

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", response_text.len());
    let preview: String = response_text.chars().take(1024).collect();
    debug!("Response text (first 1024 chars): {preview}");

    match serde_json::from_str::<T>(&response_text) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            error!(
                "Response text (first 200 chars): {}",
                &response_text.chars().take(200).collect::<String>()
            );

            if response_text.trim().is_empty() {
                Err(AppError::api_no_data("Response body is empty", url))
            } else if !response_text.trim_start().starts_with('{')
                && !response_text.trim_start().starts_with('[')
            {
                Err(AppError::api_malformed_json(
                    "Response is not valid JSON",
                    url,
                ))
            } else {
                // Valid JSON but unexpected structure
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use serde_json::Value;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(10), Duration::from_millis(4000));
    }

    #[tokio::test]
    async fn test_fetch_success_sends_api_key() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(header("authorization", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let url = format!("{}/teams", mock_server.uri());
        let value: Value = fetch(&client, &url, &fast_policy()).await.unwrap();
        assert_eq!(value["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_fetch_retries_server_error_then_succeeds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games/1"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .expect(2)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/games/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let url = format!("{}/games/1", mock_server.uri());
        let value: Value = fetch(&client, &url, &fast_policy()).await.unwrap();
        assert_eq!(value["id"], 1);
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_max_attempts() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games/1"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let url = format!("{}/games/1", mock_server.uri());
        let err = fetch::<Value>(&client, &url, &fast_policy())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ApiServiceUnavailable { status: 503, .. }
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_bad_gateway_retried_then_succeeds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(2)
            .expect(2)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let url = format!("{}/teams", mock_server.uri());
        let body = fetch::<Value>(&client, &url, &fast_policy()).await.unwrap();
        assert_eq!(body["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_fetch_client_error_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let url = format!("{}/teams", mock_server.uri());
        let err = fetch::<Value>(&client, &url, &fast_policy())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ApiClientError { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_fetch_rate_limit_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let url = format!("{}/teams", mock_server.uri());
        let err = fetch::<Value>(&client, &url, &fast_policy())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ApiRateLimit { .. }));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games/404"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let url = format!("{}/games/404", mock_server.uri());
        let err = fetch::<Value>(&client, &url, &fast_policy())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        // Nothing listens on port 9 on a test host
        let client = create_test_http_client();
        let err = fetch::<Value>(&client, "http://127.0.0.1:9/teams", &fast_policy())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NetworkConnection { .. }));
    }

    #[tokio::test]
    async fn test_fetch_body_classification() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/shape"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"unexpected": true}"#))
            .mount(&mock_server)
            .await;

        #[derive(Debug, serde::Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            data: Vec<i64>,
        }

        let client = create_test_http_client();
        let policy = fast_policy();

        let err = fetch::<Needs>(&client, &format!("{}/empty", mock_server.uri()), &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ApiNoData { .. }));

        let err = fetch::<Needs>(&client, &format!("{}/html", mock_server.uri()), &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ApiMalformedJson { .. }));

        let err = fetch::<Needs>(&client, &format!("{}/shape", mock_server.uri()), &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ApiUnexpectedStructure { .. }));
    }
}
