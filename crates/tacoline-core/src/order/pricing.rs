//! Line and cart pricing with a threshold volume discount.
//!
//! Pricing rule: a line's unit price is the main dish plus every add-on the
//! customer picked (meat surcharge, side, toppings, sauces, drink). The unit
//! price is multiplied by the quantity. Carts whose subtotal reaches the
//! threshold are charged `discount_percent`% of the subtotal, rounded down.

use tacoline_types::cart::CartTotal;
use tacoline_types::catalog::Category;
use tacoline_types::config::ShopConfig;
use tacoline_types::error::OrderError;
use tacoline_types::order::{OrderLine, OrderStep};

use crate::catalog::Catalog;

/// Discount policy applied to cart subtotals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    discount_threshold: u64,
    discount_percent: u8,
}

impl PricingEngine {
    /// `discount_percent` is clamped to 100 (no surcharge).
    pub fn new(discount_threshold: u64, discount_percent: u8) -> Self {
        Self {
            discount_threshold,
            discount_percent: discount_percent.min(100),
        }
    }

    pub fn from_config(config: &ShopConfig) -> Self {
        Self::new(config.discount_threshold, config.discount_percent)
    }

    pub fn discount_threshold(&self) -> u64 {
        self.discount_threshold
    }

    /// Price of one unit of the line, before quantity.
    pub fn unit_price(&self, catalog: &Catalog, line: &OrderLine) -> Result<u64, OrderError> {
        let main = line.main.as_deref().ok_or(OrderError::SequenceError {
            expected: OrderStep::AwaitingMain,
        })?;

        let mut unit = catalog.price_of(Category::Main, main)?;
        let add_ons = [
            line.meat.as_deref().map(|name| (Category::Meat, name)),
            line.side.as_deref().map(|name| (Category::Side, name)),
        ]
        .into_iter()
        .flatten()
        .chain(line.toppings.iter().map(|name| (Category::Topping, name.as_str())))
        .chain(line.sauces.iter().map(|name| (Category::Sauce, name.as_str())))
        .chain(line.drink.as_deref().map(|name| (Category::Drink, name)));

        for (category, name) in add_ons {
            unit = unit
                .checked_add(catalog.price_of(category, name)?)
                .ok_or(OrderError::PriceOverflow)?;
        }
        Ok(unit)
    }

    /// Line subtotal: unit price x quantity. The line must be finalized.
    pub fn price_of_line(&self, catalog: &Catalog, line: &OrderLine) -> Result<u64, OrderError> {
        let quantity = line.quantity.ok_or(OrderError::SequenceError {
            expected: OrderStep::AwaitingQuantity,
        })?;
        self.unit_price(catalog, line)?
            .checked_mul(u64::from(quantity))
            .ok_or(OrderError::PriceOverflow)
    }

    /// Sum all lines and apply the discount.
    pub fn price_of_cart(
        &self,
        catalog: &Catalog,
        lines: &[OrderLine],
    ) -> Result<CartTotal, OrderError> {
        let mut subtotal: u64 = 0;
        for line in lines {
            subtotal = subtotal
                .checked_add(self.price_of_line(catalog, line)?)
                .ok_or(OrderError::PriceOverflow)?;
        }
        Ok(self.apply_discount(subtotal))
    }

    /// Discount a subtotal. Zero is never discounted.
    pub fn apply_discount(&self, subtotal: u64) -> CartTotal {
        if subtotal == 0 || subtotal < self.discount_threshold {
            return CartTotal {
                subtotal,
                discounted: subtotal,
                discount_applied: false,
            };
        }
        // Widened so the multiply cannot overflow; the result never exceeds `subtotal`.
        let discounted = u128::from(subtotal) * u128::from(self.discount_percent) / 100;
        CartTotal {
            subtotal,
            discounted: u64::try_from(discounted).unwrap_or(subtotal),
            discount_applied: true,
        }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::from_config(&ShopConfig::default())
    }
}
