//! ReplySender trait definition.

use std::future::Future;

use tacoline_types::error::ReplyError;
use tacoline_types::reply::ReplyMessage;

/// Delivers reply messages to the messaging platform.
///
/// Implementations live in tacoline-infra (e.g., LineReplyClient).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
/// Delivery is fire-and-forget: callers log failures and do not retry.
pub trait ReplySender: Send + Sync {
    /// Short name for logs (e.g., "line", "log").
    fn name(&self) -> &str;

    /// Send `messages`, in order, as the reply to `reply_token`.
    fn reply(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
    ) -> impl Future<Output = Result<(), ReplyError>> + Send;
}
