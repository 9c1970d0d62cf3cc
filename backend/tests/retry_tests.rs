//! Retry and backoff tests
//!
//! Runs on a paused tokio clock so the backoff delays are observed exactly
//! without real sleeping.

use std::sync::Mutex;
use std::time::Duration;

use bakuwaki_forecast_backend::external::{FetchError, RetryPolicy};
use reqwest::StatusCode;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};

fn unavailable() -> FetchError {
    FetchError::Status {
        url: "http://weather.test".to_string(),
        status: StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Runs `policy` against an operation that fails with `error` until
/// `succeed_on`, returning the result and the offsets of each attempt
async fn run_with(
    policy: RetryPolicy,
    succeed_on: Option<u32>,
    error: fn() -> FetchError,
) -> (Result<u32, FetchError>, Vec<Duration>) {
    let start = Instant::now();
    let attempts = Mutex::new(Vec::new());

    let result = policy
        .run("http://weather.test", |attempt| {
            let attempts = &attempts;
            async move {
                attempts.lock().unwrap().push(start.elapsed());
                match succeed_on {
                    Some(n) if attempt >= n => Ok(attempt),
                    _ => Err(error()),
                }
            }
        })
        .await;

    (result, attempts.into_inner().unwrap())
}

// ============================================================================
// Backoff timing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_two_failures_then_success() {
    let start = Instant::now();
    let (result, attempts) = run_with(RetryPolicy::default(), Some(3), unavailable).await;

    assert_eq!(assert_ok!(result), 3);
    assert_eq!(
        attempts,
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::from_secs(3)
        ]
    );
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_all_attempts_fail_without_trailing_delay() {
    let start = Instant::now();
    let (result, attempts) = run_with(RetryPolicy::default(), None, unavailable).await;

    let err = assert_err!(result);
    assert!(matches!(err, FetchError::Status { .. }));
    assert_eq!(attempts.len(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_first_attempt_success_does_not_wait() {
    let start = Instant::now();
    let (result, attempts) = run_with(RetryPolicy::default(), Some(1), unavailable).await;

    assert_eq!(assert_ok!(result), 1);
    assert_eq!(attempts.len(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_custom_policy_backoff() {
    let policy = RetryPolicy {
        max_attempts: 4,
        initial_backoff: Duration::from_millis(250),
    };
    let (result, attempts) = run_with(policy, None, unavailable).await;

    assert_err!(result);
    assert_eq!(
        attempts,
        vec![
            Duration::ZERO,
            Duration::from_millis(250),
            Duration::from_millis(750),
            Duration::from_millis(1750)
        ]
    );
}

// ============================================================================
// Errors that are never retried
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_schema_error_fails_immediately() {
    let start = Instant::now();
    let (result, attempts) = run_with(RetryPolicy::default(), None, || FetchError::Schema {
        url: "http://weather.test".to_string(),
        message: "missing field `hourly`".to_string(),
    })
    .await;

    assert!(matches!(assert_err!(result), FetchError::Schema { .. }));
    assert_eq!(attempts.len(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_client_error_status_is_not_retried() {
    let (result, attempts) = run_with(RetryPolicy::default(), None, || FetchError::Status {
        url: "http://weather.test".to_string(),
        status: StatusCode::BAD_REQUEST,
    })
    .await;

    assert_err!(result);
    assert_eq!(attempts.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_is_retried() {
    let (result, attempts) = run_with(RetryPolicy::default(), Some(2), || FetchError::Status {
        url: "http://weather.test".to_string(),
        status: StatusCode::TOO_MANY_REQUESTS,
    })
    .await;

    assert_eq!(assert_ok!(result), 2);
    assert_eq!(attempts.len(), 2);
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Each delay is twice the previous one, starting from the initial backoff
        #[test]
        fn prop_delays_double(initial_ms in 1u64..5_000, attempt in 1u32..10) {
            let policy = RetryPolicy {
                max_attempts: 10,
                initial_backoff: Duration::from_millis(initial_ms),
            };
            prop_assert_eq!(policy.delay_after(1), Duration::from_millis(initial_ms));
            prop_assert_eq!(policy.delay_after(attempt + 1), policy.delay_after(attempt) * 2);
        }

        /// Statuses outside 5xx and 429 never get a second attempt
        #[test]
        fn prop_only_server_errors_and_rate_limits_retry(code in 400u16..600) {
            let status = StatusCode::from_u16(code).unwrap();
            let err = FetchError::Status { url: "http://weather.test".to_string(), status };
            prop_assert_eq!(
                err.is_transient(),
                code >= 500 || code == 429
            );
        }
    }
}
