use thiserror::Error;

use crate::catalog::Category;
use crate::order::OrderStep;

/// Recoverable errors from the order flow. The customer's state is left
/// unchanged and they may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("unknown {category} item: '{name}'")]
    UnknownItem { category: Category, name: String },

    #[error("{} first", expected.requirement())]
    SequenceError { expected: OrderStep },

    #[error("at most {limit} sauces per item")]
    LimitExceeded { limit: usize },

    #[error("invalid quantity: '{0}'")]
    InvalidQuantity(String),

    #[error("order total exceeds the largest representable price")]
    PriceOverflow,
}

/// Errors building a catalog from configured entries.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate {category} item: '{name}'")]
    Duplicate { category: Category, name: String },

    #[error("empty item name in {0}")]
    EmptyName(Category),

    #[error("no {0} items configured")]
    MissingCategory(Category),
}

/// Errors delivering a reply to the messaging platform.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("platform API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("nothing to send")]
    Empty,
}
