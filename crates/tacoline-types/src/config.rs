//! Shop configuration types for Tacoline.
//!
//! `ShopConfig` represents the `tacoline.toml` file that controls the volume
//! discount, the payment link and, optionally, the menu itself.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;

/// Top-level configuration for the ordering bot.
///
/// All fields have sensible defaults; an empty file is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Cart subtotal at or above which the discount applies.
    #[serde(default = "default_discount_threshold")]
    pub discount_threshold: u64,

    /// Percentage of the subtotal charged once discounted (90 = 10% off).
    #[serde(default = "default_discount_percent")]
    pub discount_percent: u8,

    /// Base URL for the payment link emitted at checkout.
    #[serde(default = "default_payment_base_url")]
    pub payment_base_url: String,

    /// Menu override. Empty means the built-in menu.
    #[serde(default)]
    pub menu: Vec<CatalogEntry>,
}

fn default_discount_threshold() -> u64 {
    200
}

fn default_discount_percent() -> u8 {
    90
}

fn default_payment_base_url() -> String {
    "https://pay.tacoline.example/checkout".to_string()
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            discount_threshold: default_discount_threshold(),
            discount_percent: default_discount_percent(),
            payment_base_url: default_payment_base_url(),
            menu: Vec::new(),
        }
    }
}
