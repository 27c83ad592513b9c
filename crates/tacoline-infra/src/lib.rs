//! Infrastructure layer for Tacoline.
//!
//! Contains the adapters around the core: LINE webhook decoding and
//! signature verification, the LINE reply API client, a log-only reply
//! sender for dry runs, and the TOML shop configuration loader.

pub mod config;
pub mod line;
pub mod log_sender;
