//! Catalog of supported currencies, backed by a CSV file.
//!
//! Rows are `country, currency name, ISO code`. The first row is a header.

use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub country: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Default)]
pub struct CurrencyCatalog {
    currencies: HashMap<String, Currency>,
}

impl CurrencyCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut catalog = CurrencyCatalog::default();
        for record in csv_reader.records() {
            let record = record.context("Failed to read currency catalog")?;
            let line = record.position().map_or(0, |p| p.line());
            match (record.get(0), record.get(1), record.get(2)) {
                (Some(country), Some(name), Some(code)) => catalog.insert(Currency {
                    country: country.to_string(),
                    name: name.to_string(),
                    code: code.to_string(),
                }),
                _ => {
                    return Err(anyhow!(
                        "Catalog line {} has {} fields, expected country, currency and code",
                        line,
                        record.len()
                    ));
                }
            }
        }
        debug!(count = catalog.len(), "Loaded currency catalog");
        Ok(catalog)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open currency catalog: {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to parse currency catalog: {}", path.display()))
    }

    /// Later entries replace earlier ones with the same code.
    pub fn insert(&mut self, currency: Currency) {
        self.currencies.insert(currency.code.clone(), currency);
    }

    pub fn get(&self, code: &str) -> Option<&Currency> {
        self.currencies.get(code)
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// All entries ordered by code.
    pub fn sorted(&self) -> Vec<&Currency> {
        let mut all: Vec<_> = self.currencies.values().collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        all
    }
}

/// Reads the local catalog, downloading it from `url` first when the local
/// copy cannot be read.
pub async fn load_catalog(path: &str, url: Option<&str>) -> Result<CurrencyCatalog> {
    match CurrencyCatalog::from_path(path) {
        Ok(catalog) => Ok(catalog),
        Err(local_err) => {
            let Some(url) = url else {
                return Err(local_err);
            };
            warn!(error = %local_err, "Local catalog unavailable, downloading");
            download_catalog(url, path).await?;
            CurrencyCatalog::from_path(path)
        }
    }
}

pub async fn download_catalog(url: &str, dest: &str) -> Result<()> {
    info!(%url, %dest, "Downloading currency catalog");
    let client = reqwest::Client::builder()
        .user_agent(concat!("stonks/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch currency catalog from {url}"))?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "HTTP error: {} fetching currency catalog from {}",
            response.status(),
            url
        ));
    }

    let body = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read currency catalog from {url}"))?;
    std::fs::write(dest, &body).with_context(|| format!("Failed to save catalog to {dest}"))?;
    Ok(())
}

/// Appends one entry to the catalog file on disk.
pub fn append_currency<P: AsRef<Path>>(path: P, currency: &Currency) -> Result<()> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open file {}", path.display()))?;

    // Make sure the new row starts on its own line.
    let existing = std::fs::read(path)
        .with_context(|| format!("Could not read file {}", path.display()))?;
    if existing.last().is_some_and(|b| *b != b'\n') {
        file.write_all(b"\n")?;
    }

    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record([&currency.country, &currency.name, &currency.code])
        .with_context(|| format!("Cannot write to file {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CSV: &str = "Country,Currency,Code\n\
United States,US Dollar,USD\n\
Eurozone,Euro,EUR\n\
United Kingdom,Pound Sterling,GBP\n";

    #[test]
    fn test_skips_header_and_indexes_by_code() {
        let catalog = CurrencyCatalog::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get("Code").is_none());
        let gbp = catalog.get("GBP").unwrap();
        assert_eq!(gbp.country, "United Kingdom");
        assert_eq!(gbp.name, "Pound Sterling");
        assert!(catalog.get("gbp").is_none());
    }

    #[test]
    fn test_later_rows_replace_earlier() {
        let data = format!("{CSV}Kenya,Shilling,KES\nEcuador,US Dollar,USD\n");
        let catalog = CurrencyCatalog::from_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get("USD").unwrap().country, "Ecuador");

        let codes: Vec<_> = catalog.sorted().iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["EUR", "GBP", "KES", "USD"]);
    }

    #[test]
    fn test_short_row_is_an_error() {
        let data = "Country,Currency,Code\nKenya,Shilling\n";
        let err = CurrencyCatalog::from_reader(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_append_currency() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("stonks.csv");
        std::fs::write(&path, CSV.trim_end())?;

        append_currency(
            &path,
            &Currency {
                country: "Côte d'Ivoire".to_string(),
                name: "West African CFA franc".to_string(),
                code: "XOF".to_string(),
            },
        )?;

        let catalog = CurrencyCatalog::from_path(&path)?;
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get("XOF").unwrap().country, "Côte d'Ivoire");
        assert_eq!(catalog.get("GBP").unwrap().code, "GBP");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_catalog_downloads_when_missing() -> Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stonks.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CSV))
            .expect(1)
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new()?;
        let dest = temp_dir.path().join("stonks.csv");
        let dest = dest.to_str().unwrap();
        let url = format!("{}/stonks.csv", mock_server.uri());

        let catalog = load_catalog(dest, Some(&url)).await?;
        assert_eq!(catalog.len(), 3);
        assert!(Path::new(dest).exists());

        // Second load is served from disk.
        let catalog = load_catalog(dest, Some(&url)).await?;
        assert_eq!(catalog.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_catalog_without_url_reports_local_error() {
        let err = load_catalog("/nonexistent/stonks.csv", None).await.unwrap_err();
        assert!(err.to_string().contains("Failed to open currency catalog"));
    }

    #[tokio::test]
    async fn test_download_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.csv"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("stonks.csv");
        let url = format!("{}/missing.csv", mock_server.uri());
        let err = download_catalog(&url, dest.to_str().unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("HTTP error: 404"));
    }
}
