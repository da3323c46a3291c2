// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Timer-driven flush loop with a single-flight guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::flusher::Flusher;

/// Drives one flush per period until cancelled.
///
/// States: idle between ticks, flushing while a cycle runs, stopped once the
/// token fires. A tick that lands while a flush is still in progress is
/// skipped, so at most one flush is ever in flight and batches leave in
/// order.
pub(crate) struct Scheduler {
    flusher: Flusher,
    period: Duration,
    in_flight: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl Scheduler {
    pub(crate) fn new(
        flusher: Flusher,
        period: Duration,
        in_flight: Arc<AtomicBool>,
        cancel: CancellationToken,
    ) -> Self {
        Scheduler {
            flusher,
            period,
            in_flight,
            cancel,
        }
    }

    /// Runs until the cancellation token fires. An in-flight delivery is
    /// allowed to complete or time out on its own; cancellation is only
    /// observed between cycles.
    pub(crate) async fn run(self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await; // discard first tick, which is instantaneous

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("Flush scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    try_flush(&self.flusher, &self.in_flight).await;
                }
            }
        }
    }
}

/// Runs one flush cycle unless another one is already in progress, in which
/// case the tick is skipped. Returns whether a flush actually ran.
pub(crate) async fn try_flush(flusher: &Flusher, in_flight: &AtomicBool) -> bool {
    if in_flight
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        debug!("Skipping tick, previous flush still in progress");
        return false;
    }

    flusher.flush().await;
    in_flight.store(false, Ordering::Release);
    true
}
