use super::prompt::Prompter;
use super::ui;
use crate::core::Currency;
use crate::core::catalog::append_currency;
use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::Path;

fn non_empty(input: &str) -> Result<(), String> {
    if input.is_empty() {
        return Err("Please provide valid input".to_string());
    }
    Ok(())
}

/// Asks for a new catalog entry and appends it to `path`. Returns `None` when
/// input ends before all fields are given.
pub fn run_update<P: AsRef<Path>, R: BufRead, W: Write>(
    path: P,
    prompter: &mut Prompter<R, W>,
) -> Result<Option<Currency>> {
    let Some(country) = prompter.ask("Country", non_empty)? else {
        return Ok(None);
    };
    let Some(name) = prompter.ask("Currency", non_empty)? else {
        return Ok(None);
    };
    let Some(code) = prompter.ask("ISO Code", non_empty)? else {
        return Ok(None);
    };

    let currency = Currency {
        country,
        name,
        code,
    };
    append_currency(path, &currency)?;
    prompter.say(&format!(
        "Added {}",
        ui::style_text(&currency.code, ui::StyleType::Value)
    ))?;
    Ok(Some(currency))
}
