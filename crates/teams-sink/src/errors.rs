// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors raised while validating sink settings.
///
/// All variants are fatal and surface synchronously from
/// [`crate::config::SinkConfigBuilder::build`]; a sink is never constructed
/// from invalid settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The webhook URL was empty or whitespace.
    #[error("webhook URL must not be empty")]
    EmptyWebhookUrl,
    /// The webhook URL could not be parsed as an absolute URI.
    #[error("webhook URL is not a valid URI: {0}")]
    InvalidWebhookUrl(String),
    /// The batch size limit was below the minimum of one event per batch.
    #[error("batch size limit must be at least 1, got {0}")]
    InvalidBatchSizeLimit(usize),
    /// The flush period was zero.
    #[error("flush period must be greater than zero")]
    InvalidPeriod,
    /// The timestamp format contained an unknown strftime specifier.
    #[error("invalid timestamp format: {0:?}")]
    InvalidTimestampFormat(String),
}
