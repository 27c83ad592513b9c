//! Session router: one inbound event in, reply messages out.
//!
//! Commands act on the cart regardless of where the order flow stands. Every
//! other input is fed to the order-line state machine for the user's pending
//! line. Rejected input gets a corrective message plus the menu for the step
//! still waiting, and leaves the cart untouched.

use std::sync::Arc;

use tacoline_types::cart::Cart;
use tacoline_types::config::ShopConfig;
use tacoline_types::error::OrderError;
use tacoline_types::event::{Command, InboundEvent, Selection, UserInput};
use tacoline_types::order::{OrderLine, PendingLine};
use tacoline_types::reply::ReplyMessage;
use tracing::{debug, error, info, warn};

use crate::cart::{self, EMPTY_CART_MESSAGE};
use crate::catalog::Catalog;
use crate::order::builder::{self, Transition};
use crate::order::pricing::PricingEngine;
use crate::session::menu;
use crate::session::parse::parse_input;
use crate::session::store::SessionStore;

/// Sent when something unexpected goes wrong while handling an event.
pub const APOLOGY_TEXT: &str = "抱歉，系統忙碌中，請稍後再試。";

/// Routes user events to cart operations and the order-line state machine.
///
/// Generic over `SessionStore` so tests and alternative backends can be
/// injected; the catalog is shared read-only.
pub struct SessionRouter<S: SessionStore> {
    catalog: Arc<Catalog>,
    pricing: PricingEngine,
    payment_base_url: String,
    store: S,
}

impl<S: SessionStore> SessionRouter<S> {
    pub fn new(catalog: Arc<Catalog>, config: &ShopConfig, store: S) -> Self {
        Self {
            catalog,
            pricing: PricingEngine::from_config(config),
            payment_base_url: config.payment_base_url.clone(),
            store,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replies used when handling an event failed outright.
    pub fn apology() -> Vec<ReplyMessage> {
        vec![ReplyMessage::text(APOLOGY_TEXT)]
    }

    /// Handle one event for its user as a single atomic step.
    pub fn handle(&self, event: &InboundEvent) -> Vec<ReplyMessage> {
        self.store.with_cart(&event.user_id, |cart| {
            let input = parse_input(event, cart.pending.as_ref().map(|p| p.step));
            debug!(
                user_id = %event.user_id,
                state = ?cart.state(),
                input = ?input,
                "routing event"
            );
            match input {
                UserInput::Command(command) => self.run_command(cart, command),
                UserInput::Selection(selection) => self.select(cart, &selection),
                UserInput::Unrecognized(raw) => self.unrecognized(cart, &raw),
            }
        })
    }

    fn run_command(&self, cart: &mut Cart, command: Command) -> Vec<ReplyMessage> {
        match command {
            Command::StartOrder | Command::OrderMore => {
                let mut replies = Vec::new();
                if cart::start_line(cart) {
                    replies.push(ReplyMessage::text("已放棄未完成的餐點，重新開始點餐。"));
                }
                replies.push(menu::step_menu(&self.catalog, &PendingLine::new()));
                replies
            }
            Command::ViewCart => match cart::view_summary(&self.catalog, &self.pricing, cart) {
                Ok(summary) => vec![ReplyMessage::text(summary), self.next_menu(cart)],
                Err(err) => self.internal_fault(cart, &err),
            },
            Command::Checkout => {
                match cart::checkout(&self.catalog, &self.pricing, &self.payment_base_url, cart) {
                    Ok(None) => vec![ReplyMessage::text(EMPTY_CART_MESSAGE)],
                    Ok(Some(receipt)) => {
                        info!(
                            user_id = %cart.user_id,
                            order_id = %receipt.order_id,
                            subtotal = receipt.total.subtotal,
                            discounted = receipt.total.discounted,
                            "checkout completed"
                        );
                        let mut replies = vec![
                            ReplyMessage::text(receipt.render()),
                            ReplyMessage::text("感謝您的訂購！🌮"),
                        ];
                        if let Some(pending) = &cart.pending {
                            replies.push(menu::step_menu(&self.catalog, pending));
                        }
                        replies
                    }
                    Err(err) => self.internal_fault(cart, &err),
                }
            }
            Command::Cancel => {
                let text = if cart::cancel_pending(cart) {
                    "已取消目前的餐點。"
                } else {
                    "目前沒有進行中的餐點。"
                };
                vec![ReplyMessage::text(text), self.next_menu(cart)]
            }
            Command::Help => vec![menu::entry_menu()],
            Command::Greeting => vec![ReplyMessage::text(menu::GREETING_TEXT), menu::entry_menu()],
        }
    }

    fn select(&self, cart: &mut Cart, selection: &Selection) -> Vec<ReplyMessage> {
        match builder::apply(&self.catalog, cart.pending.as_ref(), selection) {
            Ok(Transition::Continue(next)) => {
                let reply = menu::step_menu(&self.catalog, &next);
                cart.pending = Some(next);
                vec![reply]
            }
            Ok(Transition::Completed(line)) => {
                let amount = match self.price_new_line(cart, &line) {
                    Ok(amount) => amount,
                    Err(err @ OrderError::PriceOverflow) => {
                        warn!(user_id = %cart.user_id, error = %err, "line rejected");
                        return vec![ReplyMessage::text(correction(&err)), self.resume_menu(cart)];
                    }
                    Err(err) => return self.internal_fault(cart, &err),
                };
                let text = format!(
                    "已加入購物車：{} x{} = ${}",
                    line.summary(),
                    line.quantity.unwrap_or_default(),
                    amount
                );
                info!(
                    user_id = %cart.user_id,
                    amount,
                    lines = cart.lines.len() + 1,
                    "line added to cart"
                );
                cart.lines.push(line);
                cart.pending = None;
                vec![ReplyMessage::text(text), menu::idle_menu()]
            }
            Err(err) => {
                debug!(user_id = %cart.user_id, error = %err, "selection rejected");
                vec![ReplyMessage::text(correction(&err)), self.resume_menu(cart)]
            }
        }
    }

    /// Price a finished line, making sure the cart total still fits with it.
    fn price_new_line(&self, cart: &Cart, line: &OrderLine) -> Result<u64, OrderError> {
        let amount = self.pricing.price_of_line(&self.catalog, line)?;
        let total = self.pricing.price_of_cart(&self.catalog, &cart.lines)?;
        total
            .subtotal
            .checked_add(amount)
            .ok_or(OrderError::PriceOverflow)?;
        Ok(amount)
    }

    fn unrecognized(&self, cart: &Cart, raw: &str) -> Vec<ReplyMessage> {
        match &cart.pending {
            Some(pending) => vec![
                ReplyMessage::text(format!("看不懂「{raw}」，請從選單中選擇。")),
                menu::step_menu(&self.catalog, pending),
            ],
            None => vec![menu::entry_menu()],
        }
    }

    /// Menu for the pending step, or the main-dish menu when nothing is
    /// pending (tapping a main dish starts a line).
    fn resume_menu(&self, cart: &Cart) -> ReplyMessage {
        match &cart.pending {
            Some(pending) => menu::step_menu(&self.catalog, pending),
            None => menu::step_menu(&self.catalog, &PendingLine::new()),
        }
    }

    /// What to offer after a cart-level command.
    fn next_menu(&self, cart: &Cart) -> ReplyMessage {
        match &cart.pending {
            Some(pending) => menu::step_menu(&self.catalog, pending),
            None if cart.lines.is_empty() => menu::entry_menu(),
            None => menu::idle_menu(),
        }
    }

    fn internal_fault(&self, cart: &Cart, err: &OrderError) -> Vec<ReplyMessage> {
        error!(user_id = %cart.user_id, error = %err, "internal fault while handling event");
        Self::apology()
    }
}

/// Customer-facing text for a rejected selection.
fn correction(err: &OrderError) -> String {
    match err {
        OrderError::UnknownItem { category, name } => {
            format!("菜單上沒有{}「{}」，請從選單中選擇。", category.label(), name)
        }
        OrderError::SequenceError { expected } => {
            format!("還不能選這個喔！請先完成這一步：{}", expected.prompt())
        }
        OrderError::LimitExceeded { limit } => format!("醬料最多只能選 {limit} 種喔！"),
        OrderError::InvalidQuantity(raw) => {
            format!("「{raw}」不是有效的數量，請輸入正整數。")
        }
        OrderError::PriceOverflow => "金額超出上限，請減少數量。".to_string(),
    }
}
