//! Outbound reply port.

pub mod box_sender;
pub mod sender;
