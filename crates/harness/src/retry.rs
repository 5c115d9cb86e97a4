//! Rate-limit aware HTTP execution with bounded backoff.
//!
//! The backend throttles aggressively under test load, so every call
//! goes through [`RetryingClient::execute`]: when the backend answers
//! `429 Too Many Requests` the call is retried after a wait that grows
//! by a multiplicative factor, up to a bounded number of retries. Any
//! other status is returned to the caller immediately; the retry layer
//! never interprets non-429 failures.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::debug;

/// Backoff parameters for retry-on-429.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt. Zero means a
    /// single attempt with no sleeps.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub initial_wait: Duration,
    /// Multiplier applied to the wait after each retry.
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_wait: Duration::from_secs(1),
            backoff_factor: 2.0,
        }
    }
}

/// HTTP client wrapper that retries rate-limited requests.
#[derive(Debug, Clone)]
pub struct RetryingClient {
    client: Client,
    policy: RetryPolicy,
}

impl RetryingClient {
    /// Create a new retrying client around an existing reqwest client.
    #[must_use]
    pub const fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// The underlying reqwest client, for building requests.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// The active retry policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute a request-producing thunk, retrying on `429`.
    ///
    /// The thunk is invoked once per attempt and must build a fresh
    /// request each time (bodies are consumed by sending). The last
    /// response received is returned, including a `429` once retries
    /// are exhausted; HTTP failure statuses are never turned into
    /// errors here.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` only for transport-level failures
    /// (connection refused, timeout, invalid body).
    pub async fn execute<F, Fut>(&self, mut send: F) -> Result<Response, reqwest::Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Response, reqwest::Error>>,
    {
        let mut wait = self.policy.initial_wait;
        let mut attempt: u32 = 0;

        loop {
            let response = send().await?;
            if response.status() != StatusCode::TOO_MANY_REQUESTS
                || attempt >= self.policy.max_retries
            {
                return Ok(response);
            }

            debug!(
                attempt,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "rate limited by backend, backing off"
            );
            tokio::time::sleep(wait).await;
            wait = wait.mul_f64(self.policy.backoff_factor);
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn response_with_status(code: u16) -> Response {
        let inner = http::Response::builder()
            .status(code)
            .body(String::new())
            .expect("static response should build");
        Response::from(inner)
    }

    fn client(max_retries: u32) -> RetryingClient {
        RetryingClient::new(
            Client::new(),
            RetryPolicy {
                max_retries,
                initial_wait: Duration::from_millis(100),
                backoff_factor: 2.0,
            },
        )
    }

    /// Run the retry loop against a canned status sequence, returning
    /// the final response and the number of attempts made.
    async fn run_sequence(client: &RetryingClient, statuses: &[u16]) -> (Response, usize) {
        let calls = Arc::new(AtomicUsize::new(0));
        let statuses = statuses.to_vec();
        let response = client
            .execute(|| {
                let calls = Arc::clone(&calls);
                let statuses = statuses.clone();
                async move {
                    let i = calls.fetch_add(1, Ordering::SeqCst);
                    let code = statuses.get(i).copied().unwrap_or(200);
                    Ok(response_with_status(code))
                }
            })
            .await
            .expect("thunk never fails transport");
        (response, calls.load(Ordering::SeqCst))
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success_with_growing_waits() {
        let client = client(5);
        let start = tokio::time::Instant::now();
        let (response, attempts) = run_sequence(&client, &[429, 429, 429, 200]).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(attempts, 4);
        // Three sleeps: 100ms + 200ms + 400ms on the paused clock.
        assert_eq!(start.elapsed(), Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_single_attempt() {
        let client = client(0);
        let start = tokio::time::Instant::now();
        let (response, attempts) = run_sequence(&client, &[429, 200]).await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(attempts, 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_return_last_rate_limited_response() {
        let client = client(2);
        let (response, attempts) = run_sequence(&client, &[429, 429, 429, 429]).await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_429_failures_are_returned_without_retry() {
        let client = client(5);
        let start = tokio::time::Instant::now();
        let (response, attempts) = run_sequence(&client, &[500]).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(attempts, 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
