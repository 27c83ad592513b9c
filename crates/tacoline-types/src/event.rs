//! Normalized inbound events and the typed inputs parsed from them.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::cart::UserId;
use crate::catalog::Category;
use crate::order::MealType;

/// How the user produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Free text typed by the user.
    Text,
    /// A button tap carrying the data string chosen by the menu author.
    Postback,
}

/// Platform-independent user event delivered to the session router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub kind: EventKind,
    pub payload: String,
    /// Opaque token the reply must be sent with.
    pub reply_token: String,
}

impl InboundEvent {
    pub fn text(user_id: impl Into<String>, text: impl Into<String>, reply_token: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(user_id),
            kind: EventKind::Text,
            payload: text.into(),
            reply_token: reply_token.into(),
        }
    }

    pub fn postback(user_id: impl Into<String>, data: impl Into<String>, reply_token: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(user_id),
            kind: EventKind::Postback,
            payload: data.into(),
            reply_token: reply_token.into(),
        }
    }
}

/// Cart-level commands, handled regardless of where the order flow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    StartOrder,
    OrderMore,
    ViewCart,
    Checkout,
    Cancel,
    Help,
    Greeting,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::StartOrder => "start",
            Command::OrderMore => "more",
            Command::ViewCart => "cart",
            Command::Checkout => "checkout",
            Command::Cancel => "cancel",
            Command::Help => "help",
            Command::Greeting => "hello",
        };
        write!(f, "{name}")
    }
}

/// A selection fed to the order-line state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    MainSelected(String),
    MealTypeSelected(MealType),
    SideSelected(String),
    MeatSelected(String),
    ToppingSelected(String),
    SauceSelected(String),
    DrinkSelected(String),
    /// Raw quantity text; validated by the state machine.
    QuantitySelected(String),
    /// Leave an optional step empty (for sauces: stop adding more).
    Skipped(Category),
}

impl Selection {
    /// Postback data that reproduces this selection.
    pub fn to_postback(&self) -> String {
        match self {
            Selection::MainSelected(name) => format!("main={name}"),
            Selection::MealTypeSelected(meal_type) => format!("meal={meal_type}"),
            Selection::SideSelected(name) => format!("side={name}"),
            Selection::MeatSelected(name) => format!("meat={name}"),
            Selection::ToppingSelected(name) => format!("topping={name}"),
            Selection::SauceSelected(name) => format!("sauce={name}"),
            Selection::DrinkSelected(name) => format!("drink={name}"),
            Selection::QuantitySelected(raw) => format!("qty={raw}"),
            Selection::Skipped(category) => format!("skip={category}"),
        }
    }
}

/// Everything an inbound event can mean once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Command(Command),
    Selection(Selection),
    /// Payload that matches nothing the router understands.
    Unrecognized(String),
}
