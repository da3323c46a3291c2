// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log event model consumed by the sink.
//!
//! Events are pushed into the sink by the hosting logging framework, queued,
//! and consumed exactly once by a batch. The sink never inspects an event
//! beyond what the card formatter needs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use derive_more::Display;

/// Severity of a log event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum Level {
    #[display("Trace")]
    Trace,
    #[display("Debug")]
    Debug,
    #[display("Info")]
    Info,
    #[display("Warn")]
    Warn,
    #[display("Error")]
    Error,
    #[display("Critical")]
    Critical,
}

impl Level {
    /// Teams card accent colour for this severity.
    pub fn theme_color(self) -> &'static str {
        match self {
            Level::Trace | Level::Debug => "777777",
            Level::Info => "5bc0de",
            Level::Warn => "f0ad4e",
            Level::Error | Level::Critical => "d9534f",
        }
    }
}

/// A single log event awaiting delivery.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Wall-clock time the event was created.
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    /// Fully rendered message text.
    pub message: String,
    /// Original message template, when the emitting framework provides one.
    pub message_template: Option<String>,
    /// Structured properties attached to the event. Kept sorted so the
    /// rendered card is deterministic.
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl LogEvent {
    /// Creates an event stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        LogEvent {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            message_template: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.message_template = Some(template.into());
        self
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
