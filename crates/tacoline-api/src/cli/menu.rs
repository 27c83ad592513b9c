//! `tacoline menu` -- print the catalog.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use tacoline_types::catalog::Category;

use crate::state::Shop;

pub fn show_menu(shop: &Shop, json: bool) -> Result<()> {
    if json {
        let menu = serde_json::json!({
            "discount_threshold": shop.config.discount_threshold,
            "discount_percent": shop.config.discount_percent,
            "items": shop.catalog.entries(),
        });
        println!("{}", serde_json::to_string_pretty(&menu)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Category").fg(Color::White),
        Cell::new("Item").fg(Color::White),
        Cell::new("Price").fg(Color::White),
    ]);

    for category in Category::ALL {
        for entry in shop.catalog.entries_in(category) {
            let price = if category == Category::Main {
                format!("${}", entry.price)
            } else {
                format!("+${}", entry.price)
            };
            table.add_row(vec![
                Cell::new(category.label()).fg(Color::Cyan),
                Cell::new(&entry.name),
                Cell::new(price),
            ]);
        }
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} {}% of the total on orders of ${} or more",
        style("%").green().bold(),
        shop.config.discount_percent,
        shop.config.discount_threshold
    );
    println!();

    Ok(())
}
