//! Localised prompt labels for conversion mode

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub currency: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub amount: &'static str,
}

pub const SUPPORTED: [&str; 4] = ["en", "fr", "pt", "sw"];

pub fn labels(code: &str) -> Option<Labels> {
    let labels = match code {
        "en" => Labels {
            currency: "Currency",
            from: "From",
            to: "To",
            amount: "Amount",
        },
        "fr" => Labels {
            currency: "Devise",
            from: "De",
            to: "À",
            amount: "Prix",
        },
        "sw" => Labels {
            currency: "Fedha",
            from: "Kutoka",
            to: "Kuenda",
            amount: "Bei",
        },
        "pt" => Labels {
            currency: "Moeda",
            from: "De",
            to: "Para",
            amount: "Preço",
        },
        _ => return None,
    };
    Some(labels)
}

/// Display names keyed by language code, read from a `language, code` CSV
/// with a header row.
pub fn read_language_names<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open languages file: {}", path.display()))?;

    let mut names = BTreeMap::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Failed to read languages file: {}", path.display()))?;
        if let (Some(name), Some(code)) = (record.get(0), record.get(1)) {
            names.insert(code.to_string(), name.to_string());
        }
    }
    Ok(names)
}
