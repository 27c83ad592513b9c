//! HTTP layer: the LINE webhook endpoint plus health checks.

pub mod error;
pub mod handlers;
pub mod router;
