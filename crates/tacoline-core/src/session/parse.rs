//! Turning raw event payloads into typed [`UserInput`].
//!
//! Postback data uses `key=value` pairs chosen by the menus in
//! [`super::menu`]: `main=`, `meal=`, `side=`, `meat=`, `topping=`,
//! `sauce=`, `drink=`, `qty=`, `skip=<category>` and `cmd=<command>`.
//! Free text is first checked against the command keywords, then read as a
//! selection for whatever step the user is on.

use tacoline_types::catalog::Category;
use tacoline_types::event::{Command, EventKind, InboundEvent, Selection, UserInput};
use tacoline_types::order::{MealType, OrderStep};

/// Text phrases that mean "leave this optional step empty".
const SKIP_WORDS: &[&str] = &["skip", "done", "none", "不用", "不要", "略過", "完成", "沒有"];

/// Parse an event given the step the user's pending line is on.
pub fn parse_input(event: &InboundEvent, step: Option<OrderStep>) -> UserInput {
    match event.kind {
        EventKind::Postback => parse_postback(&event.payload),
        EventKind::Text => parse_text(&event.payload, step),
    }
}

/// Parse postback data. Unknown keys or values are `Unrecognized`.
pub fn parse_postback(data: &str) -> UserInput {
    let unrecognized = || UserInput::Unrecognized(data.to_string());

    let Some((key, value)) = data.split_once('=') else {
        return unrecognized();
    };
    let value = value.trim();
    if value.is_empty() {
        return unrecognized();
    }

    let selection = match key.trim() {
        "cmd" => {
            return command_from_token(value)
                .map(UserInput::Command)
                .unwrap_or_else(unrecognized);
        }
        "main" => Selection::MainSelected(value.to_string()),
        "meal" => match value.parse::<MealType>() {
            Ok(meal_type) => Selection::MealTypeSelected(meal_type),
            Err(_) => return unrecognized(),
        },
        "side" => Selection::SideSelected(value.to_string()),
        "meat" => Selection::MeatSelected(value.to_string()),
        "topping" => Selection::ToppingSelected(value.to_string()),
        "sauce" => Selection::SauceSelected(value.to_string()),
        "drink" => Selection::DrinkSelected(value.to_string()),
        "qty" => Selection::QuantitySelected(value.to_string()),
        "skip" => match value.parse::<Category>() {
            Ok(category) => Selection::Skipped(category),
            Err(_) => return unrecognized(),
        },
        _ => return unrecognized(),
    };
    UserInput::Selection(selection)
}

/// Parse free text: commands first, then a selection for the current step.
pub fn parse_text(text: &str, step: Option<OrderStep>) -> UserInput {
    let text = text.trim();
    if let Some(command) = parse_command(text) {
        return UserInput::Command(command);
    }
    step.and_then(|step| selection_from_text(step, text))
        .map(UserInput::Selection)
        .unwrap_or_else(|| UserInput::Unrecognized(text.to_string()))
}

/// Match a command keyword, case-insensitively.
pub fn parse_command(text: &str) -> Option<Command> {
    let normalized = text.trim().to_lowercase();
    let command = match normalized.as_str() {
        "我要點餐" | "點餐" | "開始點餐" | "start order" | "order" | "i want to order" => {
            Command::StartOrder
        }
        "繼續點餐" | "再點一份" | "order more" | "more" => Command::OrderMore,
        "查看購物車" | "購物車" | "view cart" | "cart" => Command::ViewCart,
        "結帳" | "checkout" => Command::Checkout,
        "取消" | "cancel" => Command::Cancel,
        "說明" | "幫助" | "help" | "?" => Command::Help,
        "hello" | "hi" | "你好" | "哈囉" => Command::Greeting,
        _ => return None,
    };
    Some(command)
}

/// Postback command tokens (the `Display` form of [`Command`]).
fn command_from_token(token: &str) -> Option<Command> {
    [
        Command::StartOrder,
        Command::OrderMore,
        Command::ViewCart,
        Command::Checkout,
        Command::Cancel,
        Command::Help,
        Command::Greeting,
    ]
    .into_iter()
    .find(|c| c.to_string() == token)
}

/// Read free text as the selection the current step expects.
///
/// Returns `None` only when the text cannot possibly fit the step (e.g. an
/// unknown meal type); catalog membership is checked by the state machine.
pub fn selection_from_text(step: OrderStep, text: &str) -> Option<Selection> {
    if step.is_skippable() && SKIP_WORDS.contains(&text.to_lowercase().as_str()) {
        return step.category().map(Selection::Skipped);
    }

    let value = text.to_string();
    let selection = match step {
        OrderStep::AwaitingMain => Selection::MainSelected(value),
        OrderStep::AwaitingMealType => Selection::MealTypeSelected(text.parse().ok()?),
        OrderStep::AwaitingSide => Selection::SideSelected(value),
        OrderStep::AwaitingMeat => Selection::MeatSelected(value),
        OrderStep::AwaitingToppings => Selection::ToppingSelected(value),
        OrderStep::AwaitingSauce => Selection::SauceSelected(value),
        OrderStep::AwaitingDrink => Selection::DrinkSelected(value),
        OrderStep::AwaitingQuantity => Selection::QuantitySelected(value),
    };
    Some(selection)
}
