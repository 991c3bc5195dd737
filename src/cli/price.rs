use super::lookup::{UNSUPPORTED_CURRENCY, validate_code};
use super::prompt::Prompter;
use super::ui;
use crate::core::{Analyzer, CurrencyCatalog, CurrentPrice, PriceQuote};
use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use comfy_table::Cell;
use std::io::{BufRead, Write};

pub fn display_prices(
    catalog: &CurrencyCatalog,
    codes: &[String],
    price: &CurrentPrice,
    at: DateTime<Local>,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Base"),
        ui::header_cell("Country"),
        ui::header_cell("Currency"),
        ui::header_cell("ISO 4217 Code"),
        ui::header_cell("Price"),
        ui::header_cell("Time"),
    ]);

    let time = at.format("%a %b %e %H:%M:%S %z %Y").to_string();
    for code in codes {
        let (country, name) = catalog
            .get(code)
            .map_or(("", ""), |c| (c.country.as_str(), c.name.as_str()));
        table.add_row(vec![
            Cell::new(&price.base),
            Cell::new(country),
            Cell::new(name),
            Cell::new(code),
            ui::format_optional_cell(price.rate(code), |r| format!("{r:.6}")),
            Cell::new(&time),
        ]);
    }
    table.to_string()
}

/// Fetches and renders the current price of `codes`, all of which must be in
/// the catalog.
pub async fn check_prices(
    analyzer: &dyn Analyzer,
    catalog: &CurrencyCatalog,
    codes: &[String],
) -> Result<String> {
    if let Some(unknown) = codes.iter().find(|c| catalog.get(c).is_none()) {
        bail!("{UNSUPPORTED_CURRENCY}: {unknown}");
    }

    let spinner = ui::new_spinner("Fetching current prices");
    let quote = analyzer.get_current_price(codes).await;
    spinner.finish_and_clear();

    match quote? {
        PriceQuote::Available(price) => Ok(display_prices(catalog, codes, &price, Local::now())),
        PriceQuote::Unavailable { message } => Ok(ui::style_text(&message, ui::StyleType::Error)),
    }
}

/// Asks for one currency at a time and shows its current price.
pub async fn run_price<R: BufRead, W: Write>(
    analyzer: &dyn Analyzer,
    catalog: &CurrencyCatalog,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    while let Some(code) = prompter.ask("Currency", |input| validate_code(catalog, input))? {
        let output = check_prices(analyzer, catalog, &[code]).await?;
        prompter.say(&output)?;
    }
    Ok(())
}
