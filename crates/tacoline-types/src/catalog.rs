use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Menu categories. Every catalog entry belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Main,
    Meat,
    Topping,
    Sauce,
    Side,
    Drink,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 6] = [
        Category::Main,
        Category::Meat,
        Category::Topping,
        Category::Sauce,
        Category::Side,
        Category::Drink,
    ];

    /// Display label shown to customers.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Main => "主餐",
            Category::Meat => "肉類",
            Category::Topping => "配料",
            Category::Sauce => "醬料",
            Category::Side => "副餐",
            Category::Drink => "飲料",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Main => write!(f, "main"),
            Category::Meat => write!(f, "meat"),
            Category::Topping => write!(f, "topping"),
            Category::Sauce => write!(f, "sauce"),
            Category::Side => write!(f, "side"),
            Category::Drink => write!(f, "drink"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(Category::Main),
            "meat" => Ok(Category::Meat),
            "topping" => Ok(Category::Topping),
            "sauce" => Ok(Category::Sauce),
            "side" => Ok(Category::Side),
            "drink" => Ok(Category::Drink),
            other => Err(format!("invalid category: '{other}'")),
        }
    }
}

/// One priced item on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: Category,
    pub name: String,
    /// Unit price in whole dollars (NT$).
    pub price: u64,
}

impl CatalogEntry {
    pub fn new(category: Category, name: impl Into<String>, price: u64) -> Self {
        Self {
            category,
            name: name.into(),
            price,
        }
    }
}
