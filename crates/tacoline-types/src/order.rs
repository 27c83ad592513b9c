//! Order line types and the steps of the order-building flow.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::catalog::Category;

/// Maximum number of sauces on one line.
pub const MAX_SAUCES: usize = 3;

/// Whether a line is a single item or a combo (adds side + drink steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Single,
    Combo,
}

impl MealType {
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Single => "單點",
            MealType::Combo => "套餐",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealType::Single => write!(f, "single"),
            MealType::Combo => write!(f, "combo"),
        }
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "單點" => Ok(MealType::Single),
            "combo" | "套餐" => Ok(MealType::Combo),
            other => Err(format!("invalid meal type: '{other}'")),
        }
    }
}

/// The selection a pending line is waiting for.
///
/// Steps are visited in declaration order; `AwaitingSide` and `AwaitingDrink`
/// are only visited for combos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStep {
    AwaitingMain,
    AwaitingMealType,
    AwaitingSide,
    AwaitingMeat,
    AwaitingToppings,
    AwaitingSauce,
    AwaitingDrink,
    AwaitingQuantity,
}

impl OrderStep {
    /// The catalog category selected at this step, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            OrderStep::AwaitingMain => Some(Category::Main),
            OrderStep::AwaitingSide => Some(Category::Side),
            OrderStep::AwaitingMeat => Some(Category::Meat),
            OrderStep::AwaitingToppings => Some(Category::Topping),
            OrderStep::AwaitingSauce => Some(Category::Sauce),
            OrderStep::AwaitingDrink => Some(Category::Drink),
            OrderStep::AwaitingMealType | OrderStep::AwaitingQuantity => None,
        }
    }

    /// Whether the customer may skip this step without choosing anything.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            OrderStep::AwaitingMeat
                | OrderStep::AwaitingToppings
                | OrderStep::AwaitingSauce
                | OrderStep::AwaitingDrink
        )
    }

    /// Question asked when the step is entered.
    pub fn prompt(&self) -> &'static str {
        match self {
            OrderStep::AwaitingMain => "請選擇主餐",
            OrderStep::AwaitingMealType => "要單點還是套餐？",
            OrderStep::AwaitingSide => "請選擇套餐副餐",
            OrderStep::AwaitingMeat => "要加點肉類嗎？",
            OrderStep::AwaitingToppings => "請選擇配料",
            OrderStep::AwaitingSauce => "請選擇醬料（最多 3 種）",
            OrderStep::AwaitingDrink => "請選擇套餐飲料",
            OrderStep::AwaitingQuantity => "請輸入數量",
        }
    }

    /// What the customer still has to do, used in out-of-order corrections.
    pub fn requirement(&self) -> &'static str {
        match self {
            OrderStep::AwaitingMain => "select a main dish",
            OrderStep::AwaitingMealType => "choose single item or combo",
            OrderStep::AwaitingSide => "select a side",
            OrderStep::AwaitingMeat => "select a meat",
            OrderStep::AwaitingToppings => "select a topping",
            OrderStep::AwaitingSauce => "select a sauce",
            OrderStep::AwaitingDrink => "select a drink",
            OrderStep::AwaitingQuantity => "enter a quantity",
        }
    }
}

impl fmt::Display for OrderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStep::AwaitingMain => "awaiting_main",
            OrderStep::AwaitingMealType => "awaiting_meal_type",
            OrderStep::AwaitingSide => "awaiting_side",
            OrderStep::AwaitingMeat => "awaiting_meat",
            OrderStep::AwaitingToppings => "awaiting_toppings",
            OrderStep::AwaitingSauce => "awaiting_sauce",
            OrderStep::AwaitingDrink => "awaiting_drink",
            OrderStep::AwaitingQuantity => "awaiting_quantity",
        };
        write!(f, "{name}")
    }
}

/// One configurable dish. Fields are only set once their step completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub main: Option<String>,
    pub meal_type: Option<MealType>,
    pub side: Option<String>,
    pub meat: Option<String>,
    /// Duplicates allowed.
    pub toppings: Vec<String>,
    /// Duplicates allowed, at most [`MAX_SAUCES`].
    pub sauces: Vec<String>,
    pub drink: Option<String>,
    pub quantity: Option<u32>,
}

impl OrderLine {
    pub fn is_combo(&self) -> bool {
        self.meal_type == Some(MealType::Combo)
    }

    /// One-line description for cart listings and receipts, without quantity.
    pub fn summary(&self) -> String {
        let mut head = self.main.clone().unwrap_or_else(|| "（未選主餐）".to_string());
        if let Some(meal_type) = self.meal_type {
            head.push_str(&format!("（{}）", meal_type.label()));
        }

        let mut parts = vec![head];
        if let Some(meat) = &self.meat {
            parts.push(format!("肉類: {meat}"));
        }
        if !self.toppings.is_empty() {
            parts.push(format!("配料: {}", self.toppings.join("、")));
        }
        if !self.sauces.is_empty() {
            parts.push(format!("醬料: {}", self.sauces.join("、")));
        }
        if let Some(side) = &self.side {
            parts.push(format!("副餐: {side}"));
        }
        if let Some(drink) = &self.drink {
            parts.push(format!("飲料: {drink}"));
        }
        parts.join("｜")
    }
}

/// A line still being built, plus the step it is waiting on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLine {
    pub line: OrderLine,
    pub step: OrderStep,
}

impl PendingLine {
    /// A fresh line waiting for its main dish.
    pub fn new() -> Self {
        Self {
            line: OrderLine::default(),
            step: OrderStep::AwaitingMain,
        }
    }
}

impl Default for PendingLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a customer's conversation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "step", rename_all = "snake_case")]
pub enum SessionState {
    /// No line in progress; waiting for "order more" or "checkout".
    Idle,
    Building(OrderStep),
}
