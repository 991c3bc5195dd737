use super::prompt::Prompter;
use super::ui;
use crate::core::{Currency, CurrencyCatalog};
use anyhow::Result;
use comfy_table::Cell;
use std::io::{BufRead, Write};

pub const UNSUPPORTED_CURRENCY: &str = "We currently do not support the specified currency";

pub fn validate_code(catalog: &CurrencyCatalog, input: &str) -> Result<(), String> {
    match catalog.get(input) {
        Some(_) => Ok(()),
        None => Err(UNSUPPORTED_CURRENCY.to_string()),
    }
}

pub fn display_currencies(currencies: &[&Currency]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Country"),
        ui::header_cell("Currency"),
        ui::header_cell("ISO 4217 Code"),
    ]);
    for currency in currencies {
        table.add_row(vec![
            Cell::new(&currency.country),
            Cell::new(&currency.name),
            Cell::new(&currency.code),
        ]);
    }
    table.to_string()
}

/// Asks for currency codes until input ends, showing each match.
pub fn run_lookup<R: BufRead, W: Write>(
    catalog: &CurrencyCatalog,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    while let Some(code) = prompter.ask("Currency", |input| validate_code(catalog, input))? {
        if let Some(currency) = catalog.get(&code) {
            prompter.say(&display_currencies(&[currency]))?;
        }
    }
    Ok(())
}

pub fn list_all(catalog: &CurrencyCatalog) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text("Supported currencies", ui::StyleType::Title)
    );
    output.push_str(&display_currencies(&catalog.sorted()));
    output.push_str(&format!(
        "\n\n{} {}",
        ui::style_text("Total:", ui::StyleType::Label),
        ui::style_text(&catalog.len().to_string(), ui::StyleType::Value)
    ));
    output
}
