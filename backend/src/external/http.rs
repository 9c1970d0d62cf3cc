//! Retrying JSON GET shared by the weather and tide clients

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::HttpConfig;

/// Failure of a single external fetch
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed after {attempts} attempt(s): {source}")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("unexpected response from {url}: {message}")]
    Schema { url: String, message: String },

    #[error("no lunar age published for {date}")]
    NotFound { date: NaiveDate },
}

impl FetchError {
    /// Network failures, timeouts, 5xx and 429 are worth another attempt
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::Schema { .. } | FetchError::NotFound { .. } => false,
        }
    }
}

/// Bounded retry with doubling delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: config.initial_backoff(),
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed `attempt` (1-based): 1x, 2x, 4x ...
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempts
    /// run out. The closure receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, url: &str, mut operation: F) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        url,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Fetch attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// GET `url` with `query` and decode the JSON body, retrying per `policy`
pub async fn get_json<T, Q>(
    client: &Client,
    policy: &RetryPolicy,
    url: &str,
    query: &Q,
) -> Result<T, FetchError>
where
    T: DeserializeOwned,
    Q: serde::Serialize + ?Sized,
{
    policy
        .run(url, |attempt| async move {
            let response = client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    attempts: attempt,
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    attempts: attempt,
                    source,
                })?;

            serde_json::from_slice(&body).map_err(|e| FetchError::Schema {
                url: url.to_string(),
                message: e.to_string(),
            })
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
    }

    #[test]
    fn test_transient_classification() {
        let status = |code| FetchError::Status {
            url: "u".into(),
            status: code,
        };
        assert!(status(StatusCode::SERVICE_UNAVAILABLE).is_transient());
        assert!(status(StatusCode::TOO_MANY_REQUESTS).is_transient());
        assert!(!status(StatusCode::NOT_FOUND).is_transient());
        assert!(!FetchError::Schema {
            url: "u".into(),
            message: "m".into()
        }
        .is_transient());
    }
}
