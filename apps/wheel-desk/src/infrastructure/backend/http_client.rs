//! HTTP client wrapper with retry logic.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::ErrorResponse;
use super::config::{BackendHttpConfig, RetryConfig};
use super::error::BackendHttpError;

/// HTTP client for the assistant backend with retry logic.
#[derive(Debug, Clone)]
pub struct BackendHttpClient {
    client: Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl BackendHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &BackendHttpConfig) -> Result<Self, BackendHttpError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendHttpError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            retry_config: config.retry.clone(),
        })
    }

    /// Make a GET request with query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendHttpError> {
        self.request(Method::GET, path, query, None::<&()>, &self.retry_config)
            .await
    }

    /// Make a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendHttpError> {
        self.request(Method::POST, path, &[], Some(body), &self.retry_config)
            .await
    }

    /// Make a POST request with a JSON body that is never retried.
    ///
    /// For requests that create more than one record, where a retry after a
    /// partial failure would duplicate the records that did succeed.
    pub async fn post_once<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendHttpError> {
        self.request(Method::POST, path, &[], Some(body), &RetryConfig::none())
            .await
    }

    /// Make a POST request with no body, discarding the response.
    pub async fn post_empty(&self, path: &str) -> Result<(), BackendHttpError> {
        let _: serde_json::Value = self
            .request(Method::POST, path, &[], None::<&()>, &self.retry_config)
            .await?;
        Ok(())
    }

    /// Make a PUT request with a JSON body, discarding the response.
    pub async fn put<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), BackendHttpError> {
        let _: serde_json::Value = self
            .request(Method::PUT, path, &[], Some(body), &self.retry_config)
            .await?;
        Ok(())
    }

    /// Make a DELETE request, discarding the response.
    pub async fn delete(&self, path: &str) -> Result<(), BackendHttpError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, path, &[], None::<&()>, &self.retry_config)
            .await?;
        Ok(())
    }

    /// Internal request implementation with retry logic.
    async fn request<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        retry: &RetryConfig,
    ) -> Result<T, BackendHttpError> {
        let url = format!("{}{path}", self.base_url);
        let mut backoff = ExponentialBackoff::new(retry);

        loop {
            let mut request = self.client.request(method.clone(), &url);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(b) = body {
                request = request.json(b);
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            delay_ms = delay.as_millis() as u64,
                            attempt = backoff.attempt,
                            path,
                            "Network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    if backoff.attempt <= 1 {
                        return Err(BackendHttpError::Network(e.to_string()));
                    }
                    return Err(BackendHttpError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                    });
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| BackendHttpError::Network(e.to_string()))?;
                if text.trim().is_empty() {
                    return serde_json::from_str("null")
                        .map_err(|e| BackendHttpError::JsonParse(e.to_string()));
                }
                return serde_json::from_str(&text)
                    .map_err(|e| BackendHttpError::JsonParse(e.to_string()));
            }

            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());

            let error_body = response.text().await.unwrap_or_default();
            let error_message = serde_json::from_str::<ErrorResponse>(&error_body)
                .ok()
                .and_then(ErrorResponse::into_message)
                .unwrap_or(error_body);

            match categorize_status(status) {
                ErrorCategory::RateLimited => {
                    let delay = match retry_after {
                        Some(secs) => backoff.next_backoff().map(|_| Duration::from_secs(secs)),
                        None => backoff.next_backoff(),
                    };
                    if let Some(delay) = delay {
                        tracing::warn!(
                            delay_ms = delay.as_millis() as u64,
                            path,
                            "Rate limited, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(BackendHttpError::RateLimited {
                        retry_after_secs: retry_after.unwrap_or(60),
                    });
                }
                ErrorCategory::Retryable => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            status = status.as_u16(),
                            message = %error_message,
                            delay_ms = delay.as_millis() as u64,
                            path,
                            "Retryable error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(BackendHttpError::Api {
                        status: status.as_u16(),
                        message: error_message,
                    });
                }
                ErrorCategory::NonRetryable => {
                    return match status {
                        StatusCode::NOT_FOUND => Err(BackendHttpError::NotFound {
                            resource: if error_message.is_empty() {
                                path.to_string()
                            } else {
                                error_message
                            },
                        }),
                        _ => Err(BackendHttpError::Api {
                            status: status.as_u16(),
                            message: error_message,
                        }),
                    };
                }
            }
        }
    }
}

/// Error category for determining retry behavior.
enum ErrorCategory {
    RateLimited,
    Retryable,
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500 | 502 | 503 | 504 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Exponential backoff calculator.
struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let backoff = self.current_backoff;
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        Some(backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorize_rate_limited() {
        assert!(matches!(
            categorize_status(StatusCode::TOO_MANY_REQUESTS),
            ErrorCategory::RateLimited
        ));
    }

    #[test]
    fn categorize_retryable() {
        for status in [
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::GATEWAY_TIMEOUT,
        ] {
            assert!(matches!(categorize_status(status), ErrorCategory::Retryable));
        }
    }

    #[test]
    fn categorize_non_retryable() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::NOT_FOUND,
            StatusCode::UNPROCESSABLE_ENTITY,
        ] {
            assert!(matches!(
                categorize_status(status),
                ErrorCategory::NonRetryable
            ));
        }
    }

    #[test]
    fn exponential_backoff_doubles_until_exhausted() {
        let config = RetryConfig {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        };
        let mut backoff = ExponentialBackoff::new(&config);

        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(400)));
        assert_eq!(backoff.next_backoff(), None);
    }

    #[test]
    fn exponential_backoff_respects_max() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
            multiplier: 10.0,
        };
        let mut backoff = ExponentialBackoff::new(&config);

        backoff.next_backoff();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn single_attempt_never_backs_off() {
        let mut backoff = ExponentialBackoff::new(&RetryConfig::none());
        assert_eq!(backoff.next_backoff(), None);
    }
}
