//! LINE Messaging API adapter.
//!
//! - `signature` -- `X-Line-Signature` verification (HMAC-SHA256, base64)
//! - `webhook` -- webhook payload types and conversion to `InboundEvent`
//! - `client` -- reply API client implementing `ReplySender`

pub mod client;
pub mod signature;
pub mod webhook;
