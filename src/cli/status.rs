use super::ui;
use crate::core::config::AppConfig;
use crate::core::valuation;
use crate::store::PriceHistory;
use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::Cell;

pub fn run(history: &PriceHistory, config: &AppConfig, now: DateTime<Utc>) -> Result<()> {
    println!("{}", render(history, config, now));
    Ok(())
}

fn render(history: &PriceHistory, config: &AppConfig, now: DateTime<Utc>) -> String {
    let currency = config.currency.as_str();
    let latest = history.latest();
    let collected = latest.map(|r| format!("{} {}", r.date, r.time));
    let gold = latest.and_then(|r| r.gold_price);
    let silver = latest.and_then(|r| r.silver_price);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Metal"),
        ui::header_cell(&format!("Price ({currency}/g)")),
        ui::header_cell("Collected"),
    ]);
    table.add_row(vec![
        Cell::new("Gold"),
        ui::format_optional_cell(gold, |p| format!("{p:.2}")),
        ui::format_optional_cell(collected.clone(), |c| c),
    ]);
    table.add_row(vec![
        Cell::new("Silver"),
        ui::format_optional_cell(silver, |p| format!("{p:.2}")),
        ui::format_optional_cell(collected, |c| c),
    ]);

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Latest spot prices", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    // Holdings valuation follows the configured grams; a missing price
    // makes the whole valuation unavailable rather than partial.
    let holdings_value = if gold.is_some() && silver.is_some() {
        let value = valuation::value(
            gold,
            silver,
            config.portfolio.gold_grams,
            config.portfolio.silver_grams,
        );
        ui::style_text(&format!("{value:.2}"), ui::StyleType::TotalValue)
    } else {
        ui::style_text("N/A", ui::StyleType::Error)
    };
    output.push_str(&format!(
        "\n\nHoldings {:.2} g gold, {:.2} g silver ({}): {}",
        config.portfolio.gold_grams,
        config.portfolio.silver_grams,
        ui::style_text(currency, ui::StyleType::TotalLabel),
        holdings_value
    ));

    let today = now.format("%Y-%m-%d").to_string();
    let month = now.format("%Y-%m").to_string();
    let daily_line = history.daily_peak_record(&today).map_or_else(
        || ui::style_text("none yet", ui::StyleType::Subtle),
        |r| format!("{:.2} at {}", r.portfolio_value, r.time),
    );
    let monthly_line = history.monthly_peak_record(&month).map_or_else(
        || ui::style_text("none yet", ui::StyleType::Subtle),
        |r| format!("{:.2} on {}", r.portfolio_value, r.date),
    );
    output.push_str(&format!("\nToday's peak: {daily_line}"));
    output.push_str(&format!("\nThis month's peak: {monthly_line}"));

    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(
            &format!("{} readings on record", history.records.len()),
            ui::StyleType::Subtle
        )
    ));
    output
}
