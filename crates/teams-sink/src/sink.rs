// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Sink lifecycle: start the flush scheduler, accept events, stop cleanly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::SinkConfig;
use crate::event::LogEvent;
use crate::flusher::{DeliveryResult, Flusher, ShippingError};
use crate::queue::EventQueue;
use crate::scheduler::Scheduler;
use crate::teams::TeamsApi;

/// Handle to a running Microsoft Teams sink.
///
/// Emitters push events through [`TeamsSink::emit`]; a background task posts
/// them in batches every period. Dropping the handle cancels the background
/// task, but only [`TeamsSink::stop`] drains remaining events first.
pub struct TeamsSink {
    queue: Arc<EventQueue>,
    flusher: Flusher,
    cancel: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
    stopped: AtomicBool,
}

impl TeamsSink {
    /// Builds the webhook client and spawns the flush scheduler.
    ///
    /// Must be called from within a tokio runtime. Each sink instance is
    /// fully independent; nothing is shared between sinks.
    pub fn start(config: SinkConfig) -> Result<Self, ShippingError> {
        let config = Arc::new(config);
        let queue = Arc::new(EventQueue::new());
        let api = TeamsApi::new(&config)?;
        let flusher = Flusher::new(Arc::clone(&queue), api, Arc::clone(&config));
        let cancel = CancellationToken::new();
        let in_flight = Arc::new(AtomicBool::new(false));

        let scheduler = Scheduler::new(
            flusher.clone(),
            config.period(),
            in_flight,
            cancel.clone(),
        );
        let worker = tokio::spawn(scheduler.run());
        debug!(
            "Teams sink started, flushing up to {} events every {:?}",
            config.batch_size_limit(),
            config.period()
        );

        Ok(TeamsSink {
            queue,
            flusher,
            cancel,
            worker: Mutex::new(Some(worker)),
            stopped: AtomicBool::new(false),
        })
    }

    /// Enqueues one event for delivery.
    ///
    /// Never blocks behind delivery and never fails; events emitted after the
    /// sink stopped are dropped with a diagnostic.
    pub fn emit(&self, event: LogEvent) {
        if self.stopped.load(Ordering::Acquire) {
            debug!("Sink already stopped, dropping event");
            return;
        }
        self.queue.enqueue(event);
    }

    /// Number of events currently awaiting delivery.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Stops the scheduler and drains remaining events best-effort.
    ///
    /// Idempotent: the first call cancels the timer, waits for any in-flight
    /// flush to finish, then posts remaining batches until the queue is empty
    /// or a batch fails terminally. Later calls return immediately and do not
    /// flush again.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }

        self.cancel.cancel();
        let worker = self.worker.lock().await.take();
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                error!("Flush scheduler task failed: {err}");
            }
        }

        // Final drain. Stops at the first failed batch rather than blocking
        // shutdown behind an unreachable webhook.
        loop {
            match self.flusher.flush().await {
                DeliveryResult::Skipped => break,
                DeliveryResult::Delivered { .. } => {}
                DeliveryResult::TransientExhausted(_) | DeliveryResult::PermanentFailure(_) => {
                    let remaining = self.queue.len();
                    if remaining > 0 {
                        error!("Dropping {remaining} undelivered events at shutdown");
                    }
                    break;
                }
            }
        }
        debug!("Teams sink stopped");
    }
}

impl Drop for TeamsSink {
    /// Cancels the scheduler task so an abandoned handle does not keep
    /// posting in the background.
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
