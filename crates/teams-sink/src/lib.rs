// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batching Microsoft Teams incoming-webhook sink.
//!
//! Events emitted by a hosting logging framework are queued without blocking
//! the emitter, drained in bounded batches on a timer, rendered into a single
//! MessageCard document, and posted to the webhook with retry on transient
//! failure. At most one flush is in flight at any instant, and no delivery
//! error ever reaches the emitting call site.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod card;
pub mod config;
pub mod errors;
pub mod event;
pub mod flusher;
pub mod queue;
mod scheduler;
pub mod sink;
pub mod teams;

pub use config::{SinkConfig, SinkConfigBuilder};
pub use errors::ConfigError;
pub use event::{Level, LogEvent};
pub use flusher::{DeliveryResult, Flusher, ShippingError};
pub use queue::EventQueue;
pub use sink::TeamsSink;
pub use teams::{RetryStrategy, TeamsApi};

#[cfg(test)]
mod tests {
    use super::*;

    /// Ensures the sink can be configured entirely through crate-root
    /// re-exports.
    #[test]
    fn config_types_are_reexported() {
        let config = SinkConfig::builder("https://outlook.office.com/webhook/abc")
            .title("smoke")
            .retry_strategy(RetryStrategy::Immediate(1))
            .build()
            .unwrap();
        assert_eq!(config.title(), Some("smoke"));
    }
}
