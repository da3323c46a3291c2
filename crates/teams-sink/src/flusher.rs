// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! One flush cycle: drain a batch, render it, post it, classify the outcome.
//!
//! Everything that can go wrong on the delivery path is contained here and in
//! [`crate::teams`]; nothing propagates back to emitters. Dropped batches are
//! reported through `tracing` as the sink's self-diagnostics channel.

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error};

use crate::card;
use crate::config::SinkConfig;
use crate::queue::EventQueue;
use crate::teams::{is_permanent_status, TeamsApi};

/// Outcome of a single flush cycle.
#[derive(Debug)]
pub enum DeliveryResult {
    /// The batch was posted and acknowledged by the webhook.
    Delivered { events: usize },
    /// The queue was empty; nothing was sent.
    Skipped,
    /// Transient failures exhausted the retry budget; the batch was dropped.
    TransientExhausted(String),
    /// The webhook rejected the batch outright; the batch was dropped.
    PermanentFailure(String),
}

/// Errors produced while shipping a card to the webhook.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// The card could not be serialized. Not retryable.
    #[error("failed to prepare card payload: {0}")]
    Payload(String),
    /// The webhook rejected the card or the retry budget ran out.
    #[error("webhook delivery failed ({0:?}): {1}")]
    Destination(Option<StatusCode>, String),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Drains one batch per call and attempts delivery.
#[derive(Clone)]
pub struct Flusher {
    queue: Arc<EventQueue>,
    api: TeamsApi,
    config: Arc<SinkConfig>,
}

impl Flusher {
    pub fn new(queue: Arc<EventQueue>, api: TeamsApi, config: Arc<SinkConfig>) -> Self {
        Flusher { queue, api, config }
    }

    /// Runs one flush cycle.
    ///
    /// Drains up to `batch_size_limit` events; an empty drain is a no-op.
    /// A batch that fails terminally is dropped, never re-queued, so an
    /// event is delivered at most once. This method never panics and never
    /// returns an error to the caller; failures surface as diagnostics and
    /// in the returned [`DeliveryResult`].
    pub async fn flush(&self) -> DeliveryResult {
        let batch = self.queue.drain(self.config.batch_size_limit());
        if batch.is_empty() {
            return DeliveryResult::Skipped;
        }

        let events = batch.len();
        debug!("Flushing batch of {events} events");
        let card = card::build_card(&batch, &self.config);

        match self.api.post_card(&card).await {
            Ok(status) => {
                debug!("Delivered batch of {events} events ({status})");
                DeliveryResult::Delivered { events }
            }
            Err(ShippingError::Payload(reason)) => {
                error!("Dropping batch of {events} events, payload could not be prepared: {reason}");
                DeliveryResult::PermanentFailure(reason)
            }
            Err(ShippingError::Destination(status, reason)) => {
                let reason = match status {
                    Some(status) => format!("{status}: {reason}"),
                    None => reason,
                };
                if status.is_some_and(is_permanent_status) {
                    error!("Dropping batch of {events} events, webhook rejected it: {reason}");
                    DeliveryResult::PermanentFailure(reason)
                } else {
                    error!("Dropping batch of {events} events after exhausting retries: {reason}");
                    DeliveryResult::TransientExhausted(reason)
                }
            }
            Err(ShippingError::Client(reason)) => {
                error!("Dropping batch of {events} events, no usable HTTP client: {reason}");
                DeliveryResult::TransientExhausted(reason)
            }
        }
    }
}
