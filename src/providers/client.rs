use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use super::fetch::execute;
use super::profile::ProviderProfile;
use super::request::RequestBuilder;
use crate::core::cross_rate::{triangulate, usable_rate};
use crate::core::quote::{failure_message, is_success};
use crate::core::{
    Analyzer, Conversion, ConversionMethod, ConversionQuote, CurrentPrice, Document, PriceQuote,
    ProviderError,
};

/// Client for one rate provider. Falls back to a cross-rate computed from
/// the provider's own current rates when its convert endpoint refuses.
pub struct ProviderClient {
    requests: RequestBuilder,
    reference_currency: String,
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn new(
        profile: ProviderProfile,
        base_url: &str,
        access_key: &str,
        reference_currency: &str,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("stonks/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ProviderClient {
            requests: RequestBuilder::new(profile, base_url, access_key),
            reference_currency: reference_currency.to_string(),
            http,
        })
    }

    fn profile(&self) -> &ProviderProfile {
        self.requests.profile()
    }

    /// Validates a current-price document against this provider's field names.
    fn parse_current_price(&self, doc: &Document) -> PriceQuote {
        let profile = self.profile();
        if !is_success(doc) {
            return PriceQuote::Unavailable {
                message: failure_message(doc),
            };
        }

        let rates = match doc.get(profile.rates_field).and_then(|v| v.as_object()) {
            Some(rates) => rates,
            None => {
                return PriceQuote::Unavailable {
                    message: format!(
                        "Response from {} has no {}",
                        profile.name, profile.rates_field
                    ),
                };
            }
        };
        let base = doc
            .get(profile.base_field)
            .and_then(|v| v.as_str())
            .unwrap_or(profile.default_base)
            .to_string();

        let rates: BTreeMap<String, f64> = rates
            .iter()
            .filter_map(|(key, value)| {
                let code = profile.code_from_key(key, &base)?;
                value.as_f64().map(|rate| (code.to_string(), rate))
            })
            .collect();

        PriceQuote::Available(CurrentPrice {
            provider: profile.name.to_string(),
            base,
            rates,
        })
    }

    fn parse_conversion(&self, doc: &Document) -> Option<Conversion> {
        if !is_success(doc) {
            return None;
        }
        doc.get("result")
            .and_then(|v| v.as_f64())
            .map(|result| Conversion {
                provider: self.profile().name.to_string(),
                method: ConversionMethod::Direct,
                result,
            })
    }

    /// Derives the conversion from current rates, FROM -> reference -> TO.
    ///
    /// A failed rate fetch is terminal. Missing or unusable rates are reported
    /// as a failed quote.
    #[instrument(name = "FallbackConvert", skip(self), fields(provider = %self.profile().name))]
    pub async fn fallback_convert(
        &self,
        to: &str,
        from: &str,
        amount: f64,
    ) -> Result<ConversionQuote, ProviderError> {
        let codes = vec![
            to.to_string(),
            from.to_string(),
            self.reference_currency.clone(),
        ];
        let price = match self.get_current_price(&codes).await {
            Ok(PriceQuote::Available(price)) => price,
            Ok(PriceQuote::Unavailable { message }) => {
                info!(%message, "Current rates unavailable for cross-rate conversion");
                return Ok(ConversionQuote::failed());
            }
            Err(e) => return Err(ProviderError::conversion_failed(e)),
        };

        let rates = (
            usable_rate(price.rate(&self.reference_currency)),
            usable_rate(price.rate(from)),
            usable_rate(price.rate(to)),
        );
        match rates {
            (Some(reference_rate), Some(from_rate), Some(to_rate)) => {
                let result = triangulate(reference_rate, from_rate, to_rate, amount);
                debug!(reference_rate, from_rate, to_rate, result, "Derived cross-rate conversion");
                Ok(ConversionQuote::Converted(Conversion {
                    provider: self.profile().name.to_string(),
                    method: ConversionMethod::CrossRate,
                    result,
                }))
            }
            _ => {
                info!(?rates, "Missing rates for cross-rate conversion");
                Ok(ConversionQuote::failed())
            }
        }
    }
}

#[async_trait]
impl Analyzer for ProviderClient {
    fn name(&self) -> &str {
        self.profile().name
    }

    #[instrument(
        name = "ProviderCurrentPrice",
        skip(self),
        fields(provider = %self.profile().name)
    )]
    async fn get_current_price(&self, codes: &[String]) -> Result<PriceQuote, ProviderError> {
        let request = self.requests.current_price(codes)?;
        let doc = execute(&self.http, request).await?;
        Ok(self.parse_current_price(&doc))
    }

    #[instrument(name = "ProviderConvert", skip(self), fields(provider = %self.profile().name))]
    async fn convert(
        &self,
        to: &str,
        from: &str,
        amount: f64,
    ) -> Result<ConversionQuote, ProviderError> {
        let response = match self.requests.convert(to, from, amount) {
            Ok(request) => execute(&self.http, request).await,
            Err(e) => Err(e),
        };
        match response {
            Ok(doc) => {
                if let Some(conversion) = self.parse_conversion(&doc) {
                    return Ok(ConversionQuote::Converted(conversion));
                }
                info!(
                    reason = %failure_message(&doc),
                    "Convert endpoint refused, deriving from current rates"
                );
            }
            Err(e) => warn!(
                error = %e,
                "Convert endpoint unreachable, deriving from current rates"
            ),
        }
        self.fallback_convert(to, from, amount).await
    }
}
