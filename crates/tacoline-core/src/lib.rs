//! Business logic and port definitions for Tacoline.
//!
//! This crate owns the per-user order-building state machine, the catalog,
//! pricing, cart operations and the session router. It defines the
//! `SessionStore` and `ReplySender` ports and depends only on
//! `tacoline-types` -- never on `tacoline-infra` or any network crate.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod reply;
pub mod session;
