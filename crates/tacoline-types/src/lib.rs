//! Shared domain types for Tacoline.
//!
//! This crate contains the core domain types used across the Tacoline ordering
//! bot: catalog categories, order lines, carts, inbound events, reply payloads,
//! shop configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod order;
pub mod reply;
