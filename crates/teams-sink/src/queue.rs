// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Thread-safe FIFO buffer between event emitters and the flush scheduler.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::event::LogEvent;

/// Unbounded FIFO queue of events awaiting delivery.
///
/// `enqueue` is called from any number of emitter threads and must never fail
/// or block them behind delivery; the scheduler is the only consumer. A
/// drained event is never handed out twice.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: Mutex<VecDeque<LogEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue::default()
    }

    /// Appends an event at the tail. Infallible; a poisoned lock is recovered
    /// since the queue holds no invariants beyond element order.
    pub fn enqueue(&self, event: LogEvent) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push_back(event);
    }

    /// Removes and returns up to `max` events from the head, oldest first.
    /// Returns fewer when fewer are queued, and an empty vec when none are.
    pub fn drain(&self, max: usize) -> Vec<LogEvent> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let take = max.min(guard.len());
        guard.drain(..take).collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
