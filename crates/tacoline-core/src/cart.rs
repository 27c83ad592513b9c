//! Cart operations: listing, starting/cancelling lines, and checkout.

use tacoline_types::cart::{Cart, Receipt, ReceiptLine};
use tacoline_types::error::OrderError;
use tacoline_types::order::PendingLine;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::order::pricing::PricingEngine;

/// Shown whenever the cart has no finalized lines.
pub const EMPTY_CART_MESSAGE: &str = "購物車是空的，輸入「我要點餐」開始點餐吧！";

/// Human-readable listing of the cart's finalized lines.
pub fn view_summary(
    catalog: &Catalog,
    pricing: &PricingEngine,
    cart: &Cart,
) -> Result<String, OrderError> {
    if cart.lines.is_empty() {
        return Ok(EMPTY_CART_MESSAGE.to_string());
    }

    let mut out = String::from("🛒 購物車\n");
    for (i, line) in cart.lines.iter().enumerate() {
        let amount = pricing.price_of_line(catalog, line)?;
        out.push_str(&format!(
            "{}. {} x{} = ${}\n",
            i + 1,
            line.summary(),
            line.quantity.unwrap_or_default(),
            amount
        ));
    }

    let total = pricing.price_of_cart(catalog, &cart.lines)?;
    out.push_str(&format!("小計: ${}", total.subtotal));
    if total.discount_applied {
        out.push_str(&format!("（滿 ${} 打折後 ${}）", pricing.discount_threshold(), total.discounted));
    }
    Ok(out)
}

/// Begin a new line at the main-dish step, replacing any unfinished one.
///
/// Returns true if an unfinished line was discarded.
pub fn start_line(cart: &mut Cart) -> bool {
    cart.pending.replace(PendingLine::new()).is_some()
}

/// Drop the line in progress. Returns false if there was none.
pub fn cancel_pending(cart: &mut Cart) -> bool {
    cart.pending.take().is_some()
}

/// Empty the finalized lines, keeping the cart and any line in progress.
pub fn clear(cart: &mut Cart) {
    cart.lines.clear();
}

/// Price the cart, build a receipt with a payment link, then clear `lines`.
///
/// Returns `Ok(None)` for an empty cart without touching it. On a pricing
/// error the cart is left unchanged.
pub fn checkout(
    catalog: &Catalog,
    pricing: &PricingEngine,
    payment_base_url: &str,
    cart: &mut Cart,
) -> Result<Option<Receipt>, OrderError> {
    if cart.lines.is_empty() {
        return Ok(None);
    }

    let mut lines = Vec::with_capacity(cart.lines.len());
    for line in &cart.lines {
        lines.push(ReceiptLine {
            summary: line.summary(),
            quantity: line.quantity.unwrap_or_default(),
            amount: pricing.price_of_line(catalog, line)?,
        });
    }
    let total = pricing.price_of_cart(catalog, &cart.lines)?;

    let order_id = Uuid::now_v7();
    let payment_link = format!(
        "{}?order={}&amount={}",
        payment_base_url.trim_end_matches('/'),
        order_id,
        total.discounted
    );

    clear(cart);

    Ok(Some(Receipt {
        order_id,
        lines,
        total,
        payment_link,
    }))
}
