use reqwest::{Method, Url};

use super::profile::ProviderProfile;
use crate::core::ProviderError;

/// A fully formed provider call: method and URL with query string, no body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub provider: &'static str,
    pub method: Method,
    pub url: Url,
}

/// Builds provider calls for one provider account.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    profile: ProviderProfile,
    base_url: String,
    access_key: String,
}

impl RequestBuilder {
    pub fn new(profile: ProviderProfile, base_url: &str, access_key: &str) -> Self {
        RequestBuilder {
            profile,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        }
    }

    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    /// Codes are joined in input order; duplicates are kept.
    pub fn current_price(&self, codes: &[String]) -> Result<ProviderRequest, ProviderError> {
        let symbols = codes.join(",");
        self.post(
            self.profile.latest_path,
            &[
                ("access_key", self.access_key.as_str()),
                (self.profile.symbols_param, symbols.as_str()),
            ],
        )
    }

    /// The amount is passed through as given, negative values included.
    pub fn convert(
        &self,
        to: &str,
        from: &str,
        amount: f64,
    ) -> Result<ProviderRequest, ProviderError> {
        let amount = amount.to_string();
        self.post(
            self.profile.convert_path,
            &[
                ("access_key", self.access_key.as_str()),
                ("from", from),
                ("to", to),
                ("amount", amount.as_str()),
            ],
        )
    }

    fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<ProviderRequest, ProviderError> {
        let endpoint = format!("{}{}", self.base_url, path);
        let url = Url::parse_with_params(&endpoint, params).map_err(|e| {
            ProviderError::RequestConstruction {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(ProviderRequest {
            provider: self.profile.name,
            method: Method::POST,
            url,
        })
    }
}
