use super::lookup::{UNSUPPORTED_CURRENCY, validate_code};
use super::prompt::Prompter;
use super::ui;
use crate::core::language::{self, Labels};
use crate::core::{Analyzer, ConversionMethod, ConversionQuote, CurrencyCatalog};
use anyhow::{Context, Result, anyhow, bail};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

pub fn parse_amount(input: &str) -> Result<f64, String> {
    match input.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        Ok(_) => Err("Make sure input is a finite number".to_string()),
        Err(e) => Err(format!("Make sure input is a valid number {e}")),
    }
}

/// Picks the label set: an explicit language wins, otherwise the user
/// chooses from the supported ones.
pub fn resolve_labels<R: BufRead, W: Write>(
    requested: Option<&str>,
    names: &BTreeMap<String, String>,
    prompter: &mut Prompter<R, W>,
) -> Result<Option<Labels>> {
    if let Some(code) = requested {
        return language::labels(code)
            .map(Some)
            .ok_or_else(|| anyhow!("Unsupported language: {code}"));
    }

    let items: Vec<(String, String)> = language::SUPPORTED
        .iter()
        .map(|code| {
            let name = names.get(*code).cloned().unwrap_or_default();
            (code.to_string(), name)
        })
        .collect();
    Ok(prompter
        .select("Select Language", &items)?
        .and_then(|code| language::labels(&code)))
}

pub fn format_conversion(amount: f64, from: &str, to: &str, quote: &ConversionQuote) -> String {
    match quote {
        ConversionQuote::Converted(conversion) => {
            let via = match conversion.method {
                ConversionMethod::Direct => conversion.provider.clone(),
                ConversionMethod::CrossRate => format!("{}, cross rate", conversion.provider),
            };
            format!(
                "{} {} -> {} {} {}",
                amount,
                ui::style_text(from, ui::StyleType::Label),
                ui::style_text(&format!("{:.4}", conversion.result), ui::StyleType::Value),
                ui::style_text(to, ui::StyleType::Label),
                ui::style_text(&format!("({via})"), ui::StyleType::Subtle),
            )
        }
        ConversionQuote::Failed { message } => ui::style_text(message, ui::StyleType::Error),
    }
}

pub async fn convert_once(
    analyzer: &dyn Analyzer,
    catalog: &CurrencyCatalog,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<String> {
    for code in [from, to] {
        if catalog.get(code).is_none() {
            bail!("{UNSUPPORTED_CURRENCY}: {code}");
        }
    }
    if !amount.is_finite() {
        bail!("Make sure input is a finite number");
    }

    let spinner = ui::new_spinner("Converting");
    let quote = analyzer.convert(to, from, amount).await;
    spinner.finish_and_clear();

    let quote = quote.context("Failed to complete conversion")?;
    Ok(format_conversion(amount, from, to, &quote))
}

/// Interactive conversion loop with localised labels.
pub async fn run_convert<R: BufRead, W: Write>(
    analyzer: &dyn Analyzer,
    catalog: &CurrencyCatalog,
    labels: Labels,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let label = |name: &str| format!("{name} [{}]", labels.currency);
    loop {
        let Some(from) = prompter.ask(&label(labels.from), |i| validate_code(catalog, i))? else {
            break;
        };
        let Some(to) = prompter.ask(&label(labels.to), |i| validate_code(catalog, i))? else {
            break;
        };
        let Some(amount) = prompter.ask(&label(labels.amount), |i| parse_amount(i).map(|_| ()))?
        else {
            break;
        };
        let amount = parse_amount(&amount).map_err(|e| anyhow!(e))?;

        let output = convert_once(analyzer, catalog, &from, &to, amount).await?;
        prompter.say(&output)?;
    }
    Ok(())
}
