//! Menu payloads offered at each step.

use tacoline_types::catalog::Category;
use tacoline_types::event::{Command, Selection};
use tacoline_types::order::{MealType, OrderStep, PendingLine, MAX_SAUCES};
use tacoline_types::reply::{MenuOption, ReplyMessage};

use crate::catalog::Catalog;

/// Quick quantity buttons; any number up to the maximum can be typed.
const QUANTITY_SHORTCUTS: [u32; 5] = [1, 2, 3, 4, 5];

pub const HELP_TEXT: &str = "歡迎光臨 Taco 小舖！🌮\n\
輸入「我要點餐」開始點餐，或輸入「查看購物車」看看已點的餐點。";

pub const GREETING_TEXT: &str = "你好，請問你需要什麼服務？";

/// The menu for the step `pending` is waiting on.
pub fn step_menu(catalog: &Catalog, pending: &PendingLine) -> ReplyMessage {
    let step = pending.step;
    match step {
        OrderStep::AwaitingMealType => ReplyMessage::menu(
            step.prompt(),
            [MealType::Single, MealType::Combo]
                .into_iter()
                .map(|meal_type| {
                    MenuOption::new(
                        meal_type.label(),
                        Selection::MealTypeSelected(meal_type).to_postback(),
                    )
                })
                .collect(),
        ),
        OrderStep::AwaitingQuantity => ReplyMessage::menu(
            step.prompt(),
            QUANTITY_SHORTCUTS
                .into_iter()
                .map(|n| {
                    MenuOption::new(
                        n.to_string(),
                        Selection::QuantitySelected(n.to_string()).to_postback(),
                    )
                })
                .collect(),
        ),
        _ => category_menu(catalog, pending, step),
    }
}

fn category_menu(catalog: &Catalog, pending: &PendingLine, step: OrderStep) -> ReplyMessage {
    let Some(category) = step.category() else {
        return ReplyMessage::text(step.prompt());
    };

    let offered = catalog.options_for(category, &pending.line);
    let mut options: Vec<MenuOption> = catalog
        .entries_in(category)
        .filter(|e| offered.contains(&e.name.as_str()))
        .map(|e| {
            let label = if category == Category::Main {
                format!("{} ${}", e.name, e.price)
            } else {
                format!("{} +${}", e.name, e.price)
            };
            MenuOption::new(label, selection_for(category, &e.name).to_postback())
        })
        .collect();

    if step.is_skippable() {
        let label = match category {
            Category::Sauce if !pending.line.sauces.is_empty() => "完成",
            _ => "不用了",
        };
        options.push(MenuOption::new(label, Selection::Skipped(category).to_postback()));
    }

    let title = if category == Category::Sauce && !pending.line.sauces.is_empty() {
        format!(
            "{}\n已選: {}（{}/{}）",
            step.prompt(),
            pending.line.sauces.join("、"),
            pending.line.sauces.len(),
            MAX_SAUCES
        )
    } else {
        step.prompt().to_string()
    };

    ReplyMessage::menu(title, options)
}

fn selection_for(category: Category, name: &str) -> Selection {
    let name = name.to_string();
    match category {
        Category::Main => Selection::MainSelected(name),
        Category::Meat => Selection::MeatSelected(name),
        Category::Topping => Selection::ToppingSelected(name),
        Category::Sauce => Selection::SauceSelected(name),
        Category::Side => Selection::SideSelected(name),
        Category::Drink => Selection::DrinkSelected(name),
    }
}

/// Offered once a line is in the cart.
pub fn idle_menu() -> ReplyMessage {
    ReplyMessage::menu(
        "還需要什麼嗎？",
        vec![
            command_option("繼續點餐", Command::OrderMore),
            command_option("查看購物車", Command::ViewCart),
            command_option("結帳", Command::Checkout),
        ],
    )
}

/// The two entry points, shown with the help text.
pub fn entry_menu() -> ReplyMessage {
    ReplyMessage::menu(
        HELP_TEXT,
        vec![
            command_option("我要點餐", Command::StartOrder),
            command_option("查看購物車", Command::ViewCart),
        ],
    )
}

fn command_option(label: &str, command: Command) -> MenuOption {
    MenuOption::new(label, format!("cmd={command}"))
}
