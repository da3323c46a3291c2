// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Renders a batch of log events into a single Teams MessageCard document.
//!
//! The legacy MessageCard schema is what incoming webhooks accept: a card
//! with an accent colour, an optional title, and one section per event
//! carrying the message, the formatted timestamp, and a fact table. Building
//! a card is pure; all I/O lives in [`crate::teams`].

use serde::Serialize;

use crate::config::SinkConfig;
use crate::event::{Level, LogEvent};

const CARD_TYPE: &str = "MessageCard";
const CARD_CONTEXT: &str = "http://schema.org/extensions";
const DEFAULT_SUMMARY: &str = "Log events";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCard {
    #[serde(rename = "@type")]
    pub card_type: &'static str,
    #[serde(rename = "@context")]
    pub context: &'static str,
    /// Accent colour taken from the most severe level in the batch.
    pub theme_color: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub sections: Vec<CardSection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSection {
    pub activity_title: String,
    pub activity_subtitle: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<CardFact>,
}

#[derive(Debug, Serialize)]
pub struct CardFact {
    pub name: String,
    pub value: String,
}

/// Builds the card for one batch. The batch is expected to be non-empty;
/// an empty batch still yields a valid card with no sections.
pub fn build_card(batch: &[LogEvent], config: &SinkConfig) -> MessageCard {
    let severest = batch.iter().map(|e| e.level).max().unwrap_or(Level::Info);

    MessageCard {
        card_type: CARD_TYPE,
        context: CARD_CONTEXT,
        theme_color: severest.theme_color().to_string(),
        summary: config.title().unwrap_or(DEFAULT_SUMMARY).to_string(),
        title: config.title().map(str::to_string),
        sections: batch
            .iter()
            .map(|event| build_section(event, config))
            .collect(),
    }
}

fn build_section(event: &LogEvent, config: &SinkConfig) -> CardSection {
    let mut facts = Vec::new();

    if config.include_level() {
        facts.push(CardFact {
            name: "Level".to_string(),
            value: event.level.to_string(),
        });
    }
    if config.include_message_template() {
        if let Some(template) = &event.message_template {
            facts.push(CardFact {
                name: "Message template".to_string(),
                value: template.clone(),
            });
        }
    }
    if config.include_properties() {
        // BTreeMap iteration keeps the fact table in sorted key order.
        for (key, value) in &event.properties {
            facts.push(CardFact {
                name: key.clone(),
                value: render_property(value),
            });
        }
    }

    CardSection {
        activity_title: event.message.clone(),
        activity_subtitle: format_timestamp(event, config),
        facts,
    }
}

/// Strings render bare; everything else renders as compact JSON.
fn render_property(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_timestamp(event: &LogEvent, config: &SinkConfig) -> String {
    match config.timestamp_format() {
        // The format string was validated at config build time.
        Some(format) => event.timestamp.format(format).to_string(),
        None => event.timestamp.to_rfc3339(),
    }
}
