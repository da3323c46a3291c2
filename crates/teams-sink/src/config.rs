// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Validated, immutable sink settings.
//!
//! All validation happens once, in [`SinkConfigBuilder::build`]; every other
//! component reads the resulting [`SinkConfig`] through an `Arc` for the
//! lifetime of the sink and can rely on the invariants checked here.

use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use reqwest::Url;

use crate::errors::ConfigError;
use crate::teams::RetryStrategy;

const DEFAULT_BATCH_SIZE_LIMIT: usize = 1;
const DEFAULT_PERIOD: Duration = Duration::from_secs(1);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for a Microsoft Teams webhook sink.
///
/// Invariants: `batch_size_limit >= 1`, `period > 0`, and `webhook_url` is a
/// parsed absolute URI. Constructed once, never mutated.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    webhook_url: Url,
    title: Option<String>,
    batch_size_limit: usize,
    period: Duration,
    timestamp_format: Option<String>,
    include_properties: bool,
    include_level: bool,
    include_message_template: bool,
    request_timeout: Duration,
    retry_strategy: RetryStrategy,
}

impl SinkConfig {
    /// Starts a builder for the given incoming-webhook URL.
    pub fn builder(webhook_url: impl Into<String>) -> SinkConfigBuilder {
        SinkConfigBuilder {
            webhook_url: webhook_url.into(),
            title: None,
            batch_size_limit: DEFAULT_BATCH_SIZE_LIMIT,
            period: DEFAULT_PERIOD,
            timestamp_format: None,
            include_properties: true,
            include_level: true,
            include_message_template: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_strategy: RetryStrategy::default(),
        }
    }

    /// The incoming webhook URI events are posted to.
    pub fn webhook_url(&self) -> &Url {
        &self.webhook_url
    }

    /// Optional title rendered on every card.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Maximum number of events posted in a single batch.
    pub fn batch_size_limit(&self) -> usize {
        self.batch_size_limit
    }

    /// Time to wait between checking for event batches.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Optional strftime format for event timestamps; RFC 3339 when unset.
    pub fn timestamp_format(&self) -> Option<&str> {
        self.timestamp_format.as_deref()
    }

    /// Whether event properties appear in the card.
    pub fn include_properties(&self) -> bool {
        self.include_properties
    }

    /// Whether the event level appears in the card.
    pub fn include_level(&self) -> bool {
        self.include_level
    }

    /// Whether the message template appears in the card.
    pub fn include_message_template(&self) -> bool {
        self.include_message_template
    }

    /// Timeout applied to each individual delivery attempt.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Retry policy for transient delivery failures.
    pub fn retry_strategy(&self) -> &RetryStrategy {
        &self.retry_strategy
    }
}

/// Builder for [`SinkConfig`]; `build` performs all validation.
#[derive(Debug, Clone)]
pub struct SinkConfigBuilder {
    webhook_url: String,
    title: Option<String>,
    batch_size_limit: usize,
    period: Duration,
    timestamp_format: Option<String>,
    include_properties: bool,
    include_level: bool,
    include_message_template: bool,
    request_timeout: Duration,
    retry_strategy: RetryStrategy,
}

impl SinkConfigBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn batch_size_limit(mut self, limit: usize) -> Self {
        self.batch_size_limit = limit;
        self
    }

    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }

    pub fn include_properties(mut self, include: bool) -> Self {
        self.include_properties = include;
        self
    }

    pub fn include_level(mut self, include: bool) -> Self {
        self.include_level = include;
        self
    }

    pub fn include_message_template(mut self, include: bool) -> Self {
        self.include_message_template = include;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Validates the settings and produces an immutable [`SinkConfig`].
    pub fn build(self) -> Result<SinkConfig, ConfigError> {
        if self.webhook_url.trim().is_empty() {
            return Err(ConfigError::EmptyWebhookUrl);
        }
        let webhook_url = Url::parse(&self.webhook_url)
            .map_err(|err| ConfigError::InvalidWebhookUrl(err.to_string()))?;
        if self.batch_size_limit < 1 {
            return Err(ConfigError::InvalidBatchSizeLimit(self.batch_size_limit));
        }
        if self.period.is_zero() {
            return Err(ConfigError::InvalidPeriod);
        }
        if let Some(format) = &self.timestamp_format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(ConfigError::InvalidTimestampFormat(format.clone()));
            }
        }

        Ok(SinkConfig {
            webhook_url,
            title: self.title,
            batch_size_limit: self.batch_size_limit,
            period: self.period,
            timestamp_format: self.timestamp_format,
            include_properties: self.include_properties,
            include_level: self.include_level,
            include_message_template: self.include_message_template,
            request_timeout: self.request_timeout,
            retry_strategy: self.retry_strategy,
        })
    }
}
