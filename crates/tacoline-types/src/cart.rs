use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

use crate::order::{OrderLine, PendingLine, SessionState};

/// Opaque identifier of a messaging-platform user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A customer's cart: finalized lines plus at most one line in progress.
///
/// Lives for the lifetime of the process only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: UserId,
    /// Finalized lines, in the order they were completed.
    pub lines: Vec<OrderLine>,
    pub pending: Option<PendingLine>,
    pub created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            lines: Vec::new(),
            pending: None,
            created_at: Utc::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.pending {
            Some(pending) => SessionState::Building(pending.step),
            None => SessionState::Idle,
        }
    }
}

/// Cart totals before and after the volume discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotal {
    pub subtotal: u64,
    pub discounted: u64,
    pub discount_applied: bool,
}

/// One priced line on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub summary: String,
    pub quantity: u32,
    /// Line subtotal (unit price x quantity).
    pub amount: u64,
}

/// Itemized result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub order_id: Uuid,
    pub lines: Vec<ReceiptLine>,
    pub total: CartTotal,
    pub payment_link: String,
}

impl Receipt {
    /// Render the receipt as a chat message.
    pub fn render(&self) -> String {
        let mut out = String::from("🧾 訂單明細\n");
        for (i, line) in self.lines.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} x{} = ${}\n",
                i + 1,
                line.summary,
                line.quantity,
                line.amount
            ));
        }
        out.push_str(&format!("小計: ${}\n", self.total.subtotal));
        if self.total.discount_applied {
            out.push_str(&format!("折扣後: ${}\n", self.total.discounted));
        }
        out.push_str(&format!("應付金額: ${}\n", self.total.discounted));
        out.push_str(&format!("付款連結: {}", self.payment_link));
        out
    }
}
