//! Retry policy for catalog requests.
//!
//! The catalog is read-only, so every request is safe to repeat. Retries are
//! still off by default ([`RetryConfig::default`] makes a single attempt);
//! [`RetryConfig::standard`] allows two more.
//!
//! | Condition | Retried |
//! |-----------|---------|
//! | HTTP 408, 409, 429, 5xx | yes |
//! | connect / timeout / request build errors | yes |
//! | `x-should-retry: true` / `false` | forced either way |
//! | anything else (e.g. 406 for a missing row) | no |
//!
//! Backoff doubles from `initial_delay` up to `max_delay`, scaled down by a
//! random factor in `[1 - jitter_factor, 1]`. A server-provided
//! `Retry-After-Ms` / `Retry-After` under one minute wins over the backoff.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::HeaderMap};

const MAX_SERVER_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Largest fraction shaved off a backoff delay.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    /// Three attempts in total.
    #[must_use]
    pub fn standard() -> Self {
        Self::default().with_max_retries(2)
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exponential delay before retry number `retry + 1`, without jitter.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    fn jittered(&self, delay: Duration) -> Duration {
        let shave = rand::random::<f64>() * self.jitter_factor.clamp(0.0, 1.0);
        delay.mul_f64(1.0 - shave)
    }

    /// How long to wait before retry number `retry + 1`.
    #[must_use]
    pub fn delay_for(&self, retry: u32, headers: Option<&HeaderMap>) -> Duration {
        headers
            .and_then(server_delay)
            .unwrap_or_else(|| self.jittered(self.backoff(retry)))
    }
}

/// Delay requested by the server, if it is positive and under a minute.
#[must_use]
pub fn server_delay(headers: &HeaderMap) -> Option<Duration> {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    let millis = header("retry-after-ms")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map(|ms| Duration::from_secs_f64(ms / 1000.0));
    let seconds = || {
        header("retry-after")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    };

    millis
        .or_else(seconds)
        .filter(|delay| !delay.is_zero() && *delay < MAX_SERVER_DELAY)
}

/// Whether a non-success response is worth another attempt.
#[must_use]
pub fn is_retryable_status(status: StatusCode, headers: &HeaderMap) -> bool {
    let forced = headers
        .get("x-should-retry")
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase);

    match forced.as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => matches!(status.as_u16(), 408 | 409 | 429 | 500..=599),
    }
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}

/// Result of [`send_with_retry`].
///
/// Error statuses get their own variant so a failure body is never decoded
/// as catalog rows.
#[derive(Debug)]
pub enum RetryOutcome {
    Success(Response),
    /// Final non-2xx response.
    HttpError(Response),
    /// Transport failure on the final attempt.
    ConnectionError {
        attempts: u32,
        source: reqwest::Error,
    },
}

/// Send the request built by `build_request`, rebuilding it for each attempt.
pub async fn send_with_retry<F>(build_request: F, config: &RetryConfig) -> RetryOutcome
where
    F: Fn() -> RequestBuilder,
{
    let mut retries: u32 = 0;

    loop {
        let retries_left = retries < config.max_retries;

        let delay = match build_request().send().await {
            Ok(response) if response.status().is_success() => {
                return RetryOutcome::Success(response);
            }
            Ok(response) => {
                if !(retries_left && is_retryable_status(response.status(), response.headers())) {
                    return RetryOutcome::HttpError(response);
                }
                let delay = config.delay_for(retries, Some(response.headers()));
                tracing::debug!(
                    status = %response.status(),
                    retry = retries + 1,
                    delay_ms = delay.as_millis(),
                    "Catalog returned a retryable status"
                );
                delay
            }
            Err(source) => {
                if !(retries_left && is_retryable_error(&source)) {
                    return RetryOutcome::ConnectionError {
                        attempts: retries + 1,
                        source,
                    };
                }
                let delay = config.delay_for(retries, None);
                tracing::debug!(
                    error = %source,
                    retry = retries + 1,
                    delay_ms = delay.as_millis(),
                    "Catalog connection failed"
                );
                delay
            }
        };

        tokio::time::sleep(delay).await;
        retries += 1;
    }
}
