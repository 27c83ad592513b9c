//! BoxReplySender -- object-safe dynamic dispatch wrapper for ReplySender.
//!
//! 1. Define an object-safe `ReplySenderDyn` trait with boxed futures
//! 2. Blanket-impl `ReplySenderDyn` for all `T: ReplySender`
//! 3. `BoxReplySender` wraps `Box<dyn ReplySenderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use tacoline_types::error::ReplyError;
use tacoline_types::reply::ReplyMessage;

use super::sender::ReplySender;

/// Object-safe version of [`ReplySender`] with boxed futures.
pub trait ReplySenderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn reply_boxed<'a>(
        &'a self,
        reply_token: &'a str,
        messages: &'a [ReplyMessage],
    ) -> Pin<Box<dyn Future<Output = Result<(), ReplyError>> + Send + 'a>>;
}

impl<T: ReplySender> ReplySenderDyn for T {
    fn name(&self) -> &str {
        ReplySender::name(self)
    }

    fn reply_boxed<'a>(
        &'a self,
        reply_token: &'a str,
        messages: &'a [ReplyMessage],
    ) -> Pin<Box<dyn Future<Output = Result<(), ReplyError>> + Send + 'a>> {
        Box::pin(self.reply(reply_token, messages))
    }
}

/// Type-erased reply sender for runtime selection (LINE API vs. log-only).
///
/// Since `ReplySender` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxReplySender` provides the same method through
/// `ReplySenderDyn`.
pub struct BoxReplySender {
    inner: Box<dyn ReplySenderDyn + Send + Sync>,
}

impl BoxReplySender {
    pub fn new<T: ReplySender + 'static>(sender: T) -> Self {
        Self {
            inner: Box::new(sender),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn reply(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
    ) -> Result<(), ReplyError> {
        self.inner.reply_boxed(reply_token, messages).await
    }
}

impl std::fmt::Debug for BoxReplySender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxReplySender")
            .field("name", &self.name())
            .finish()
    }
}
