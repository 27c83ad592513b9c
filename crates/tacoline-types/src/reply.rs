//! Reply payloads built by the session router.
//!
//! The router only builds values; rendering them into platform messages
//! (buttons, quick replies) is the messaging adapter's job.

use serde::{Deserialize, Serialize};

/// One selectable button in a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// Text shown on the button.
    pub label: String,
    /// Postback data sent back when tapped.
    pub data: String,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// A single outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyMessage {
    Text { text: String },
    Menu { title: String, options: Vec<MenuOption> },
}

impl ReplyMessage {
    pub fn text(text: impl Into<String>) -> Self {
        ReplyMessage::Text { text: text.into() }
    }

    pub fn menu(title: impl Into<String>, options: Vec<MenuOption>) -> Self {
        ReplyMessage::Menu {
            title: title.into(),
            options,
        }
    }

    /// The human-readable part of the message.
    pub fn body(&self) -> &str {
        match self {
            ReplyMessage::Text { text } => text,
            ReplyMessage::Menu { title, .. } => title,
        }
    }
}
