//! LineReplyClient -- [`ReplySender`] for the LINE Messaging API.
//!
//! Posts to `/v2/bot/message/reply`. Menus are rendered as a text message
//! carrying quick-reply postback buttons.
//!
//! The channel access token is wrapped in [`secrecy::SecretString`] and is
//! only exposed when building the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use tacoline_core::reply::sender::ReplySender;
use tacoline_types::error::ReplyError;
use tacoline_types::reply::ReplyMessage;

/// Messages LINE accepts in one reply call.
pub const MAX_MESSAGES_PER_REPLY: usize = 5;
/// Quick-reply buttons LINE accepts on one message.
pub const MAX_QUICK_REPLY_ITEMS: usize = 13;
/// Characters LINE accepts in a postback action label.
pub const MAX_LABEL_CHARS: usize = 20;
/// Characters LINE accepts in a text message.
pub const MAX_TEXT_CHARS: usize = 5000;

pub struct LineReplyClient {
    client: reqwest::Client,
    access_token: SecretString,
    base_url: String,
}

impl LineReplyClient {
    const REPLY_PATH: &'static str = "/v2/bot/message/reply";

    pub fn new(access_token: SecretString) -> Result<Self, ReplyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ReplyError::Http(e.to_string()))?;

        Ok(Self {
            client,
            access_token,
            base_url: "https://api.line.me".to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl std::fmt::Debug for LineReplyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReplyClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ReplySender for LineReplyClient {
    fn name(&self) -> &str {
        "line"
    }

    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<(), ReplyError> {
        if messages.is_empty() {
            return Err(ReplyError::Empty);
        }

        let body = json!({
            "replyToken": reply_token,
            "messages": render_messages(messages),
        });

        let url = format!("{}{}", self.base_url.trim_end_matches('/'), Self::REPLY_PATH);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ReplyError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ReplyError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        tracing::debug!(count = messages.len().min(MAX_MESSAGES_PER_REPLY), "reply delivered");
        Ok(())
    }
}

/// Render replies into LINE message objects, keeping at most
/// [`MAX_MESSAGES_PER_REPLY`].
pub fn render_messages(messages: &[ReplyMessage]) -> Vec<Value> {
    if messages.len() > MAX_MESSAGES_PER_REPLY {
        tracing::warn!(
            total = messages.len(),
            kept = MAX_MESSAGES_PER_REPLY,
            "reply exceeds LINE message limit, dropping the rest"
        );
    }
    messages
        .iter()
        .take(MAX_MESSAGES_PER_REPLY)
        .map(render_message)
        .collect()
}

fn render_message(message: &ReplyMessage) -> Value {
    match message {
        ReplyMessage::Text { text } => json!({
            "type": "text",
            "text": truncate(text, MAX_TEXT_CHARS),
        }),
        ReplyMessage::Menu { title, options } => {
            let items: Vec<Value> = options
                .iter()
                .take(MAX_QUICK_REPLY_ITEMS)
                .map(|option| {
                    json!({
                        "type": "action",
                        "action": {
                            "type": "postback",
                            "label": truncate(&option.label, MAX_LABEL_CHARS),
                            "data": option.data,
                            "displayText": option.label,
                        }
                    })
                })
                .collect();

            let mut rendered = json!({
                "type": "text",
                "text": truncate(title, MAX_TEXT_CHARS),
            });
            if !items.is_empty() {
                rendered["quickReply"] = json!({ "items": items });
            }
            rendered
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
