//! LINE webhook payload types.
//!
//! Only the fields the assistant reads are modelled; everything else in the
//! payload is ignored by serde.

use serde::Deserialize;

use tacoline_types::event::InboundEvent;

/// Top-level webhook request body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<MessageContent>,
    #[serde(default)]
    pub postback: Option<PostbackContent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageContent {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostbackContent {
    pub data: String,
}

impl WebhookEvent {
    /// Convert to an [`InboundEvent`], or `None` for events the assistant
    /// does not handle (follows, stickers, events without a reply token).
    pub fn to_inbound(&self) -> Option<InboundEvent> {
        let user_id = self.source.as_ref()?.user_id.as_deref()?;
        let reply_token = self.reply_token.as_deref()?;

        match self.event_type.as_str() {
            "message" => {
                let message = self.message.as_ref()?;
                if message.message_type != "text" {
                    return None;
                }
                let text = message.text.as_deref()?;
                Some(InboundEvent::text(user_id, text, reply_token))
            }
            "postback" => {
                let data = &self.postback.as_ref()?.data;
                Some(InboundEvent::postback(user_id, data.as_str(), reply_token))
            }
            _ => None,
        }
    }
}

impl WebhookBody {
    /// All supported events, in delivery order.
    pub fn inbound_events(&self) -> Vec<InboundEvent> {
        self.events
            .iter()
            .filter_map(|event| {
                let inbound = event.to_inbound();
                if inbound.is_none() {
                    tracing::debug!(event_type = %event.event_type, "skipping unsupported webhook event");
                }
                inbound
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacoline_types::event::EventKind;

    const PAYLOAD: &str = r#"{
        "destination": "Uxxxxxxxx",
        "events": [
            {
                "type": "message",
                "replyToken": "tok-1",
                "source": {"type": "user", "userId": "U1"},
                "timestamp": 1700000000000,
                "message": {"id": "1", "type": "text", "text": "我要點餐"}
            },
            {
                "type": "postback",
                "replyToken": "tok-2",
                "source": {"type": "user", "userId": "U2"},
                "postback": {"data": "main=雞肉Taco"}
            },
            {
                "type": "message",
                "replyToken": "tok-3",
                "source": {"type": "user", "userId": "U1"},
                "message": {"id": "2", "type": "sticker", "packageId": "1", "stickerId": "1"}
            },
            {
                "type": "follow",
                "replyToken": "tok-4",
                "source": {"type": "user", "userId": "U3"}
            },
            {
                "type": "unfollow",
                "source": {"type": "user", "userId": "U3"}
            }
        ]
    }"#;

    #[test]
    fn test_decodes_text_and_postback() {
        let body: WebhookBody = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(body.events.len(), 5);

        let events = body.inbound_events();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].user_id.as_str(), "U1");
        assert_eq!(events[0].kind, EventKind::Text);
        assert_eq!(events[0].payload, "我要點餐");
        assert_eq!(events[0].reply_token, "tok-1");

        assert_eq!(events[1].kind, EventKind::Postback);
        assert_eq!(events[1].payload, "main=雞肉Taco");
    }

    #[test]
    fn test_empty_events_is_valid() {
        // LINE sends this when verifying the webhook URL.
        let body: WebhookBody = serde_json::from_str(r#"{"destination":"U0","events":[]}"#).unwrap();
        assert!(body.inbound_events().is_empty());
    }

    #[test]
    fn test_malformed_payload_rejected() {
        assert!(serde_json::from_str::<WebhookBody>(r#"{"events": "nope"}"#).is_err());
        assert!(serde_json::from_slice::<WebhookBody>(b"not json").is_err());
    }
}
