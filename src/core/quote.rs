//! Typed provider responses and the provider error taxonomy

use std::collections::BTreeMap;
use thiserror::Error;

/// Raw JSON object returned by a provider before validation.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub const CONVERSION_FAILED_MESSAGE: &str = "Conversion failed. Please try again later";

/// Failures raised while talking to a provider. Business-level failures
/// (`success != true`) are never represented here; see [`PriceQuote`] and
/// [`ConversionQuote`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Could not build request for {endpoint}: {reason}")]
    RequestConstruction { endpoint: String, reason: String },

    #[error("Could not complete request to {provider}: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not read response body from {provider}: {source}")]
    Decode {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Conversion failed. Please try again later")]
    ConversionFailed {
        #[source]
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    pub fn conversion_failed(source: ProviderError) -> Self {
        ProviderError::ConversionFailed {
            source: Box::new(source),
        }
    }
}

/// Rates published by a provider, all relative to `base`.
///
/// Keys are plain currency codes regardless of how the provider spells them
/// on the wire. Codes the provider does not know are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPrice {
    pub provider: String,
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

impl CurrentPrice {
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriceQuote {
    Available(CurrentPrice),
    Unavailable { message: String },
}

impl PriceQuote {
    pub fn is_success(&self) -> bool {
        matches!(self, PriceQuote::Available(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMethod {
    /// Answered by the provider's own convert endpoint.
    Direct,
    /// Derived from the provider's current rates through the reference currency.
    CrossRate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub provider: String,
    pub method: ConversionMethod,
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionQuote {
    Converted(Conversion),
    Failed { message: String },
}

impl ConversionQuote {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionQuote::Converted(_))
    }

    pub fn result(&self) -> Option<f64> {
        match self {
            ConversionQuote::Converted(c) => Some(c.result),
            ConversionQuote::Failed { .. } => None,
        }
    }

    pub(crate) fn failed() -> Self {
        ConversionQuote::Failed {
            message: CONVERSION_FAILED_MESSAGE.to_string(),
        }
    }
}

/// True only when the document carries `"success": true`.
pub fn is_success(doc: &Document) -> bool {
    doc.get("success").and_then(serde_json::Value::as_bool) == Some(true)
}

/// Best-effort human readable reason from a failed provider document.
///
/// Both providers report failures as `{"error": {"code": .., "info": ".."}}`,
/// sometimes with `type` instead of `info`.
pub fn failure_message(doc: &Document) -> String {
    let error = doc.get("error");
    error
        .and_then(|e| e.get("info").or_else(|| e.get("type")))
        .and_then(serde_json::Value::as_str)
        .or_else(|| doc.get("message").and_then(serde_json::Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| match error.and_then(|e| e.get("code")) {
            Some(code) => format!("Provider returned error code {code}"),
            None => "Provider did not report success".to_string(),
        })
}
