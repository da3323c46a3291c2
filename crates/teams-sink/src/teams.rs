// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Webhook client: one HTTP POST per card, with retry on transient failure.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::card::MessageCard;
use crate::config::SinkConfig;
use crate::flusher::ShippingError;

/// Retry policy applied to transient delivery failures.
///
/// The attempt count is a total cap, not a retry count: `Immediate(1)` sends
/// once and never retries. Computed delays bound the total retry window.
#[derive(Debug, Clone)]
pub enum RetryStrategy {
    /// Retry immediately, up to the given number of attempts.
    Immediate(u32),
    /// Fixed delay in milliseconds between attempts.
    LinearBackoff(u32, u64),
    /// Delay doubles from `base_ms` per attempt, capped at `max_ms`.
    ExponentialBackoff {
        attempts: u32,
        base_ms: u64,
        max_ms: u64,
    },
}

impl RetryStrategy {
    /// Total number of delivery attempts, never less than one.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryStrategy::Immediate(attempts) | RetryStrategy::LinearBackoff(attempts, _) => {
                *attempts
            }
            RetryStrategy::ExponentialBackoff { attempts, .. } => *attempts,
        }
        .max(1)
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            RetryStrategy::Immediate(_) => Duration::ZERO,
            RetryStrategy::LinearBackoff(_, delay_ms) => Duration::from_millis(*delay_ms),
            RetryStrategy::ExponentialBackoff {
                base_ms, max_ms, ..
            } => {
                let scaled = base_ms
                    .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
                Duration::from_millis(scaled.min(*max_ms))
            }
        }
    }
}

impl Default for RetryStrategy {
    /// Three attempts, 100 ms doubling backoff capped at 5 s.
    fn default() -> Self {
        RetryStrategy::ExponentialBackoff {
            attempts: 3,
            base_ms: 100,
            max_ms: 5_000,
        }
    }
}

/// Client for a single Teams incoming webhook.
#[derive(Debug, Clone)]
pub struct TeamsApi {
    client: Client,
    webhook_url: Url,
    retry_strategy: RetryStrategy,
}

impl TeamsApi {
    /// Builds the underlying HTTP client with the configured per-attempt
    /// timeout.
    pub fn new(config: &SinkConfig) -> Result<Self, ShippingError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| ShippingError::Client(err.to_string()))?;
        Ok(TeamsApi {
            client,
            webhook_url: config.webhook_url().clone(),
            retry_strategy: config.retry_strategy().clone(),
        })
    }

    /// POSTs one card to the webhook.
    ///
    /// Network errors, 429, and 5xx responses are retried per the strategy;
    /// any other 4xx returns immediately as a permanent failure. After the
    /// attempt cap the last transient outcome is reported as the error.
    pub async fn post_card(&self, card: &MessageCard) -> Result<StatusCode, ShippingError> {
        let body =
            serde_json::to_vec(card).map_err(|err| ShippingError::Payload(err.to_string()))?;
        let attempts = self.retry_strategy.attempts();
        let mut last_status: Option<StatusCode> = None;

        for attempt in 1..=attempts {
            let response = self
                .client
                .post(self.webhook_url.clone())
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone())
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        debug!("Webhook accepted card with status {status}");
                        return Ok(status);
                    }
                    if is_permanent_status(status) {
                        let detail = response.text().await.unwrap_or_default();
                        return Err(ShippingError::Destination(
                            Some(status),
                            format!("webhook rejected card: {detail}"),
                        ));
                    }
                    warn!("{status}: transient webhook failure (attempt {attempt}/{attempts})");
                    last_status = Some(status);
                }
                Err(err) => {
                    warn!("Network error posting card (attempt {attempt}/{attempts}): {err}");
                    last_status = None;
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.retry_strategy.delay(attempt)).await;
            }
        }

        Err(ShippingError::Destination(
            last_status,
            format!("Failed to send request after {attempts} attempts"),
        ))
    }
}

/// A 4xx short of 429 will not improve on retry.
pub(crate) fn is_permanent_status(status: StatusCode) -> bool {
    status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_never_below_one() {
        assert_eq!(RetryStrategy::Immediate(0).attempts(), 1);
        assert_eq!(RetryStrategy::LinearBackoff(0, 10).attempts(), 1);
        assert_eq!(RetryStrategy::Immediate(4).attempts(), 4);
    }

    #[test]
    fn exponential_delay_doubles_and_caps() {
        let strategy = RetryStrategy::ExponentialBackoff {
            attempts: 6,
            base_ms: 100,
            max_ms: 500,
        };
        assert_eq!(strategy.delay(1), Duration::from_millis(100));
        assert_eq!(strategy.delay(2), Duration::from_millis(200));
        assert_eq!(strategy.delay(3), Duration::from_millis(400));
        assert_eq!(strategy.delay(4), Duration::from_millis(500));
        assert_eq!(strategy.delay(5), Duration::from_millis(500));
    }

    #[test]
    fn linear_and_immediate_delays() {
        assert_eq!(
            RetryStrategy::LinearBackoff(3, 250).delay(2),
            Duration::from_millis(250)
        );
        assert_eq!(RetryStrategy::Immediate(3).delay(2), Duration::ZERO);
    }

    #[test]
    fn permanent_status_classification() {
        assert!(is_permanent_status(StatusCode::BAD_REQUEST));
        assert!(is_permanent_status(StatusCode::NOT_FOUND));
        assert!(!is_permanent_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_permanent_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_permanent_status(StatusCode::BAD_GATEWAY));
        assert!(!is_permanent_status(StatusCode::OK));
    }
}
