//! Observability setup for Tacoline.

pub mod tracing_setup;
