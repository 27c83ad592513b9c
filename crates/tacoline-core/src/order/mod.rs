//! Building and pricing order lines.

pub mod builder;
pub mod pricing;
