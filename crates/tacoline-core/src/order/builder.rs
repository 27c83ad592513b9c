//! Order line state machine.
//!
//! [`apply`] is a pure transition function: it takes the current pending line
//! (if any) and one selection, and returns either the next pending line or the
//! finished line. The caller owns the cart and commits the result, so a
//! rejected selection never mutates state.
//!
//! Step order: main -> meal type -> (side, combo only) -> meat -> topping ->
//! sauces (up to 3) -> (drink, combo only) -> quantity.

use tacoline_types::catalog::Category;
use tacoline_types::error::OrderError;
use tacoline_types::event::Selection;
use tacoline_types::order::{MealType, OrderLine, OrderStep, PendingLine, MAX_SAUCES};

use crate::catalog::Catalog;

/// Outcome of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The line is still being built; commit this as the new pending line.
    Continue(PendingLine),
    /// Quantity accepted; the line is final and belongs in the cart.
    Completed(OrderLine),
}

/// Apply one selection to the pending line.
///
/// A `MainSelected` with no pending line starts a new one. Any other
/// selection without a pending line fails with `SequenceError` asking for a
/// main dish.
pub fn apply(
    catalog: &Catalog,
    pending: Option<&PendingLine>,
    selection: &Selection,
) -> Result<Transition, OrderError> {
    // The sauce cap wins over step validation: after the third sauce the line
    // has already moved on, but a fourth sauce is still a cap violation.
    if let (Selection::SauceSelected(_), Some(current)) = (selection, pending) {
        if current.line.sauces.len() >= MAX_SAUCES {
            return Err(OrderError::LimitExceeded { limit: MAX_SAUCES });
        }
    }

    let mut next = match pending {
        Some(current) => current.clone(),
        None if matches!(selection, Selection::MainSelected(_)) => PendingLine::new(),
        None => {
            return Err(OrderError::SequenceError {
                expected: OrderStep::AwaitingMain,
            });
        }
    };

    match (next.step, selection) {
        (OrderStep::AwaitingMain, Selection::MainSelected(name)) => {
            catalog.price_of(Category::Main, name)?;
            next.line.main = Some(name.clone());
        }
        (OrderStep::AwaitingMealType, Selection::MealTypeSelected(meal_type)) => {
            next.line.meal_type = Some(*meal_type);
        }
        (OrderStep::AwaitingSide, Selection::SideSelected(name)) => {
            catalog.price_of(Category::Side, name)?;
            next.line.side = Some(name.clone());
        }
        (OrderStep::AwaitingMeat, Selection::MeatSelected(name)) => {
            catalog.price_of(Category::Meat, name)?;
            next.line.meat = Some(name.clone());
        }
        (OrderStep::AwaitingToppings, Selection::ToppingSelected(name)) => {
            catalog.price_of(Category::Topping, name)?;
            next.line.toppings.push(name.clone());
        }
        (OrderStep::AwaitingSauce, Selection::SauceSelected(name)) => {
            catalog.price_of(Category::Sauce, name)?;
            next.line.sauces.push(name.clone());
            if next.line.sauces.len() < MAX_SAUCES {
                // Stay on the sauce menu.
                return Ok(Transition::Continue(next));
            }
        }
        (OrderStep::AwaitingDrink, Selection::DrinkSelected(name)) => {
            catalog.price_of(Category::Drink, name)?;
            next.line.drink = Some(name.clone());
        }
        (OrderStep::AwaitingQuantity, Selection::QuantitySelected(raw)) => {
            next.line.quantity = Some(parse_quantity(raw)?);
            return Ok(Transition::Completed(next.line));
        }
        (step, Selection::Skipped(category))
            if step.is_skippable() && step.category() == Some(*category) => {}
        (step, _) => return Err(OrderError::SequenceError { expected: step }),
    }

    next.step = step_after(next.step, &next.line);
    Ok(Transition::Continue(next))
}

/// The step that follows `step`, given what has been chosen so far.
pub fn step_after(step: OrderStep, line: &OrderLine) -> OrderStep {
    match step {
        OrderStep::AwaitingMain => OrderStep::AwaitingMealType,
        OrderStep::AwaitingMealType if line.meal_type == Some(MealType::Combo) => {
            OrderStep::AwaitingSide
        }
        OrderStep::AwaitingMealType | OrderStep::AwaitingSide => OrderStep::AwaitingMeat,
        OrderStep::AwaitingMeat => OrderStep::AwaitingToppings,
        OrderStep::AwaitingToppings => OrderStep::AwaitingSauce,
        OrderStep::AwaitingSauce if line.is_combo() => OrderStep::AwaitingDrink,
        OrderStep::AwaitingSauce | OrderStep::AwaitingDrink | OrderStep::AwaitingQuantity => {
            OrderStep::AwaitingQuantity
        }
    }
}

/// Parse a quantity: a positive whole number. Values past `u32::MAX` are
/// not integers a line can hold and are rejected the same way.
pub fn parse_quantity(raw: &str) -> Result<u32, OrderError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(OrderError::InvalidQuantity(raw.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main(name: &str) -> Selection {
        Selection::MainSelected(name.to_string())
    }

    fn sauce(name: &str) -> Selection {
        Selection::SauceSelected(name.to_string())
    }

    /// Feed selections in order, committing each transition.
    fn run(catalog: &Catalog, selections: &[Selection]) -> PendingLine {
        let mut pending: Option<PendingLine> = None;
        for selection in selections {
            match apply(catalog, pending.as_ref(), selection).unwrap() {
                Transition::Continue(next) => pending = Some(next),
                Transition::Completed(line) => panic!("line completed early: {line:?}"),
            }
        }
        pending.expect("a pending line")
    }

    fn at_sauce_step(catalog: &Catalog) -> PendingLine {
        run(
            catalog,
            &[
                main("雞肉Taco"),
                Selection::MealTypeSelected(MealType::Single),
                Selection::Skipped(Category::Meat),
                Selection::ToppingSelected("香菜".to_string()),
            ],
        )
    }

    #[test]
    fn test_main_selection_starts_a_line() {
        let catalog = Catalog::default();
        let result = apply(&catalog, None, &main("雞肉Taco")).unwrap();
        let Transition::Continue(pending) = result else {
            panic!("expected pending line");
        };
        assert_eq!(pending.line.main.as_deref(), Some("雞肉Taco"));
        assert_eq!(pending.step, OrderStep::AwaitingMealType);
    }

    #[test]
    fn test_single_flow_skips_side_and_drink() {
        let catalog = Catalog::default();
        let pending = at_sauce_step(&catalog);
        assert_eq!(pending.step, OrderStep::AwaitingSauce);

        let after = apply(&catalog, Some(&pending), &Selection::Skipped(Category::Sauce)).unwrap();
        let Transition::Continue(pending) = after else {
            panic!("expected pending line");
        };
        assert_eq!(pending.step, OrderStep::AwaitingQuantity);
        assert!(pending.line.side.is_none());
        assert!(pending.line.drink.is_none());
    }

    #[test]
    fn test_combo_flow_visits_side_and_drink() {
        let catalog = Catalog::default();
        let pending = run(
            &catalog,
            &[
                main("牛肉Taco"),
                Selection::MealTypeSelected(MealType::Combo),
            ],
        );
        assert_eq!(pending.step, OrderStep::AwaitingSide);

        let pending = run(
            &catalog,
            &[
                main("牛肉Taco"),
                Selection::MealTypeSelected(MealType::Combo),
                Selection::SideSelected("薯條".to_string()),
                Selection::MeatSelected("牛肉".to_string()),
                Selection::ToppingSelected("起司".to_string()),
                sauce("莎莎醬"),
                Selection::Skipped(Category::Sauce),
            ],
        );
        assert_eq!(pending.step, OrderStep::AwaitingDrink);
        assert_eq!(pending.line.side.as_deref(), Some("薯條"));
        assert_eq!(pending.line.meat.as_deref(), Some("牛肉"));

        let Transition::Continue(pending) = apply(
            &catalog,
            Some(&pending),
            &Selection::DrinkSelected("可樂".to_string()),
        )
        .unwrap() else {
            panic!("expected pending line");
        };
        assert_eq!(pending.step, OrderStep::AwaitingQuantity);
        assert_eq!(pending.line.drink.as_deref(), Some("可樂"));
    }

    #[test]
    fn test_quantity_completes_line() {
        let catalog = Catalog::default();
        let mut pending = at_sauce_step(&catalog);
        pending.step = OrderStep::AwaitingQuantity;

        let result = apply(
            &catalog,
            Some(&pending),
            &Selection::QuantitySelected(" 2 ".to_string()),
        )
        .unwrap();
        let Transition::Completed(line) = result else {
            panic!("expected completed line");
        };
        assert_eq!(line.quantity, Some(2));
        assert_eq!(line.toppings, vec!["香菜".to_string()]);
    }

    #[test]
    fn test_sauces_capped_at_three() {
        let catalog = Catalog::default();
        let mut pending = at_sauce_step(&catalog);

        for name in ["酪梨醬", "酪梨醬", "辣椒醬"] {
            let Transition::Continue(next) = apply(&catalog, Some(&pending), &sauce(name)).unwrap()
            else {
                panic!("expected pending line");
            };
            pending = next;
        }
        assert_eq!(pending.line.sauces, vec!["酪梨醬", "酪梨醬", "辣椒醬"]);
        // Third sauce forces the move to quantity for a single item.
        assert_eq!(pending.step, OrderStep::AwaitingQuantity);

        let err = apply(&catalog, Some(&pending), &sauce("莎莎醬")).unwrap_err();
        assert_eq!(err, OrderError::LimitExceeded { limit: MAX_SAUCES });
        assert_eq!(pending.line.sauces.len(), 3);
    }

    #[test]
    fn test_sauce_menu_reoffered_below_cap() {
        let catalog = Catalog::default();
        let pending = at_sauce_step(&catalog);
        let Transition::Continue(next) = apply(&catalog, Some(&pending), &sauce("酪梨醬")).unwrap()
        else {
            panic!("expected pending line");
        };
        assert_eq!(next.step, OrderStep::AwaitingSauce);
    }

    #[test]
    fn test_selections_before_main_fail_with_sequence_error() {
        let catalog = Catalog::default();
        let selections = [
            Selection::MeatSelected("牛肉".to_string()),
            Selection::ToppingSelected("香菜".to_string()),
            sauce("酪梨醬"),
            Selection::QuantitySelected("2".to_string()),
            Selection::Skipped(Category::Meat),
        ];
        for selection in &selections {
            let err = apply(&catalog, None, selection).unwrap_err();
            assert_eq!(
                err,
                OrderError::SequenceError {
                    expected: OrderStep::AwaitingMain
                },
                "selection {selection:?}"
            );
            assert_eq!(err.to_string(), "select a main dish first");

            // Same with a fresh line that has no main yet.
            let fresh = PendingLine::new();
            let err = apply(&catalog, Some(&fresh), selection).unwrap_err();
            assert!(matches!(err, OrderError::SequenceError { expected: OrderStep::AwaitingMain }));
        }
    }

    #[test]
    fn test_out_of_order_selection_names_current_step() {
        let catalog = Catalog::default();
        let pending = run(&catalog, &[main("雞肉Taco")]);
        let err = apply(&catalog, Some(&pending), &sauce("酪梨醬")).unwrap_err();
        assert_eq!(
            err,
            OrderError::SequenceError {
                expected: OrderStep::AwaitingMealType
            }
        );
    }

    #[test]
    fn test_unknown_item_does_not_advance() {
        let catalog = Catalog::default();
        let pending = at_sauce_step(&catalog);
        let err = apply(&catalog, Some(&pending), &sauce("番茄醬")).unwrap_err();
        assert!(matches!(err, OrderError::UnknownItem { category: Category::Sauce, .. }));
        assert!(pending.line.sauces.is_empty());

        let err = apply(&catalog, None, &main("披薩")).unwrap_err();
        assert!(matches!(err, OrderError::UnknownItem { category: Category::Main, .. }));
    }

    #[test]
    fn test_item_from_another_category_is_unknown() {
        let catalog = Catalog::default();
        let pending = at_sauce_step(&catalog);
        let err = apply(&catalog, Some(&pending), &sauce("香菜")).unwrap_err();
        assert!(matches!(err, OrderError::UnknownItem { category: Category::Sauce, .. }));
    }

    #[test]
    fn test_required_steps_cannot_be_skipped() {
        let catalog = Catalog::default();
        let err = apply(&catalog, Some(&PendingLine::new()), &Selection::Skipped(Category::Main))
            .unwrap_err();
        assert!(matches!(err, OrderError::SequenceError { expected: OrderStep::AwaitingMain }));

        // Skip must name the current step's category.
        let pending = run(
            &catalog,
            &[main("雞肉Taco"), Selection::MealTypeSelected(MealType::Single)],
        );
        let err = apply(&catalog, Some(&pending), &Selection::Skipped(Category::Drink)).unwrap_err();
        assert!(matches!(err, OrderError::SequenceError { expected: OrderStep::AwaitingMeat }));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1").unwrap(), 1);
        assert_eq!(parse_quantity("99").unwrap(), 99);
        assert_eq!(parse_quantity("150").unwrap(), 150);
        assert_eq!(parse_quantity(" 100 ").unwrap(), 100);
        for bad in ["0", "-1", "2.5", "two", "", "4294967296"] {
            assert!(
                matches!(parse_quantity(bad), Err(OrderError::InvalidQuantity(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_quantity_keeps_line_pending() {
        let catalog = Catalog::default();
        let mut pending = at_sauce_step(&catalog);
        pending.step = OrderStep::AwaitingQuantity;
        let err = apply(
            &catalog,
            Some(&pending),
            &Selection::QuantitySelected("0".to_string()),
        )
        .unwrap_err();
        assert_eq!(err, OrderError::InvalidQuantity("0".to_string()));
        assert!(pending.line.quantity.is_none());
    }
}
