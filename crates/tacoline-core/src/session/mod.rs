//! Per-user sessions: storage port, input parsing, menus and routing.

pub mod menu;
pub mod parse;
pub mod router;
pub mod store;

pub use router::SessionRouter;
pub use store::{InMemorySessionStore, SessionStore};
