//! The static price list, grouped by category.
//!
//! A `Catalog` is built once at startup and shared read-only (behind `Arc`)
//! by every session. It has no mutation operations.

use std::collections::{HashMap, HashSet};

use tacoline_types::catalog::{Category, CatalogEntry};
use tacoline_types::error::{CatalogError, OrderError};
use tacoline_types::order::OrderLine;

/// Read-only menu: category -> item name -> unit price.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Entries in menu order, used for option listings.
    entries: Vec<CatalogEntry>,
    prices: HashMap<Category, HashMap<String, u64>>,
}

impl Catalog {
    /// Build a catalog from configured entries.
    ///
    /// Rejects empty names, duplicate names within a category, and menus that
    /// leave a category empty (every step of the order flow needs options).
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = entries
            .into_iter()
            .map(|e| CatalogEntry::new(e.category, e.name.trim(), e.price))
            .collect();

        let mut seen: HashSet<(Category, &str)> = HashSet::new();
        for entry in &entries {
            if entry.name.is_empty() {
                return Err(CatalogError::EmptyName(entry.category));
            }
            if !seen.insert((entry.category, entry.name.as_str())) {
                return Err(CatalogError::Duplicate {
                    category: entry.category,
                    name: entry.name.clone(),
                });
            }
        }

        if let Some(missing) = Category::ALL
            .into_iter()
            .find(|c| !entries.iter().any(|e| e.category == *c))
        {
            return Err(CatalogError::MissingCategory(missing));
        }

        Ok(Self::index(entries))
    }

    /// Index already-validated entries by category and name.
    fn index(entries: Vec<CatalogEntry>) -> Self {
        let mut prices: HashMap<Category, HashMap<String, u64>> = HashMap::new();
        for entry in &entries {
            prices
                .entry(entry.category)
                .or_default()
                .insert(entry.name.clone(), entry.price);
        }
        Self { entries, prices }
    }

    /// Unit price of `name` in `category`.
    pub fn price_of(&self, category: Category, name: &str) -> Result<u64, OrderError> {
        self.prices
            .get(&category)
            .and_then(|items| items.get(name))
            .copied()
            .ok_or_else(|| OrderError::UnknownItem {
                category,
                name: name.to_string(),
            })
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.price_of(category, name).is_ok()
    }

    /// Names offered for `category`, in menu order, given the line so far.
    ///
    /// Meat options do not depend on the main dish. Sides are only offered
    /// for combos.
    pub fn options_for(&self, category: Category, context: &OrderLine) -> Vec<&str> {
        if category == Category::Side && !context.is_combo() {
            return Vec::new();
        }
        self.entries_in(category).map(|e| e.name.as_str()).collect()
    }

    /// Entries of one category in menu order.
    pub fn entries_in(&self, category: Category) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The built-in taco shop menu.
    pub fn default_entries() -> Vec<CatalogEntry> {
        use Category::*;
        vec![
            CatalogEntry::new(Main, "雞肉Taco", 100),
            CatalogEntry::new(Main, "牛肉Taco", 120),
            CatalogEntry::new(Main, "鮮蝦Taco", 130),
            CatalogEntry::new(Main, "Taco Bowl", 150),
            CatalogEntry::new(Meat, "雞肉", 30),
            CatalogEntry::new(Meat, "牛肉", 40),
            CatalogEntry::new(Meat, "豬肉", 35),
            CatalogEntry::new(Topping, "香菜", 10),
            CatalogEntry::new(Topping, "洋蔥", 10),
            CatalogEntry::new(Topping, "起司", 15),
            CatalogEntry::new(Topping, "生菜", 5),
            CatalogEntry::new(Sauce, "酪梨醬", 20),
            CatalogEntry::new(Sauce, "莎莎醬", 15),
            CatalogEntry::new(Sauce, "酸奶油", 15),
            CatalogEntry::new(Sauce, "辣椒醬", 10),
            CatalogEntry::new(Side, "薯條", 40),
            CatalogEntry::new(Side, "玉米片", 35),
            CatalogEntry::new(Drink, "可樂", 30),
            CatalogEntry::new(Drink, "檸檬汁", 35),
            CatalogEntry::new(Drink, "西瓜汁", 40),
        ]
    }
}

impl Default for Catalog {
    /// The built-in menu; `test_builtin_menu_passes_validation` keeps it valid.
    fn default() -> Self {
        Self::index(Self::default_entries())
    }
}
