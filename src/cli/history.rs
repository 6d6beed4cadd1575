use super::ui;
use crate::core::config::AppConfig;
use crate::store::PriceHistory;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub fn run(history: &PriceHistory, config: &AppConfig, limit: usize) -> Result<()> {
    println!("{}", render(history, &config.currency, limit));
    Ok(())
}

fn render(history: &PriceHistory, currency: &str, limit: usize) -> String {
    if history.records.is_empty() {
        return ui::style_text("No readings recorded yet", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Time"),
        ui::header_cell(&format!("Gold ({currency}/g)")),
        ui::header_cell(&format!("Silver ({currency}/g)")),
        ui::header_cell(&format!("Value ({currency})")),
        ui::header_cell("Day"),
        ui::header_cell("Month"),
    ]);

    let start = history.records.len().saturating_sub(limit);
    for record in &history.records[start..] {
        table.add_row(vec![
            Cell::new(&record.date),
            Cell::new(&record.time),
            ui::format_optional_cell(record.gold_price, |p| format!("{p:.2}")),
            ui::format_optional_cell(record.silver_price, |p| format!("{p:.2}")),
            Cell::new(format!("{:.2}", record.portfolio_value))
                .set_alignment(CellAlignment::Right),
            ui::peak_cell(record.daily_peak),
            ui::peak_cell(record.monthly_peak),
        ]);
    }

    let mut output = table.to_string();
    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(
            &format!(
                "Showing {} of {} readings",
                history.records.len() - start,
                history.records.len()
            ),
            ui::StyleType::Subtle
        )
    ));
    output
}
