pub mod client;
pub mod fetch;
pub mod profile;
pub mod request;

use anyhow::Result;

use crate::core::GenericAnalyzer;
use crate::core::config::AppConfig;
use client::ProviderClient;
use profile::ProviderProfile;

/// Fixer first, CurrencyLayer as the fallback. Fails when either provider
/// has no credential configured.
pub fn build_analyzer(config: &AppConfig) -> Result<GenericAnalyzer> {
    let fixer_profile = ProviderProfile::fixer();
    let cl_profile = ProviderProfile::currency_layer();

    let fixer = ProviderClient::new(
        fixer_profile.clone(),
        &config.providers.fixer.base_url,
        config.providers.fixer.require_access_key(&fixer_profile)?,
        &config.reference_currency,
    )?;
    let currency_layer = ProviderClient::new(
        cl_profile.clone(),
        &config.providers.currencylayer.base_url,
        config.providers.currencylayer.require_access_key(&cl_profile)?,
        &config.reference_currency,
    )?;

    Ok(GenericAnalyzer::new(
        Box::new(fixer),
        Box::new(currency_layer),
    ))
}
