//! Reply sender that only logs, for `--dry-run` and local development.

use tacoline_core::reply::sender::ReplySender;
use tacoline_types::error::ReplyError;
use tacoline_types::reply::ReplyMessage;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingReplySender;

impl ReplySender for LoggingReplySender {
    fn name(&self) -> &str {
        "log"
    }

    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> Result<(), ReplyError> {
        if messages.is_empty() {
            return Err(ReplyError::Empty);
        }
        for (index, message) in messages.iter().enumerate() {
            let options = match message {
                ReplyMessage::Menu { options, .. } => options.len(),
                ReplyMessage::Text { .. } => 0,
            };
            tracing::info!(reply_token, index, options, body = message.body(), "reply (dry run)");
        }
        Ok(())
    }
}
