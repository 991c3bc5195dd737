//! Currency analysis abstractions and the primary/secondary orchestrator

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use super::quote::{ConversionQuote, PriceQuote, ProviderError};

#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Short name used in logs and rendered output.
    fn name(&self) -> &str;

    async fn get_current_price(&self, codes: &[String]) -> Result<PriceQuote, ProviderError>;

    async fn convert(
        &self,
        to: &str,
        from: &str,
        amount: f64,
    ) -> Result<ConversionQuote, ProviderError>;
}

/// Tries the primary analyzer and switches to the secondary when the primary
/// errors or reports anything other than success. Every call starts at the
/// primary again.
pub struct GenericAnalyzer {
    primary: Box<dyn Analyzer>,
    secondary: Box<dyn Analyzer>,
}

impl GenericAnalyzer {
    pub fn new(primary: Box<dyn Analyzer>, secondary: Box<dyn Analyzer>) -> Self {
        GenericAnalyzer { primary, secondary }
    }
}

#[async_trait]
impl Analyzer for GenericAnalyzer {
    fn name(&self) -> &str {
        "generic"
    }

    #[instrument(name = "GenericCurrentPrice", skip(self), fields(primary = %self.primary.name()))]
    async fn get_current_price(&self, codes: &[String]) -> Result<PriceQuote, ProviderError> {
        match self.primary.get_current_price(codes).await {
            Ok(PriceQuote::Available(price)) => return Ok(PriceQuote::Available(price)),
            Ok(PriceQuote::Unavailable { message }) => {
                info!(%message, "Primary provider could not price currencies, falling back");
            }
            Err(e) => warn!(error = %e, "Primary provider failed, falling back"),
        }
        self.secondary.get_current_price(codes).await
    }

    #[instrument(name = "GenericConvert", skip(self), fields(primary = %self.primary.name()))]
    async fn convert(
        &self,
        to: &str,
        from: &str,
        amount: f64,
    ) -> Result<ConversionQuote, ProviderError> {
        match self.primary.convert(to, from, amount).await {
            Ok(ConversionQuote::Converted(c)) => return Ok(ConversionQuote::Converted(c)),
            Ok(ConversionQuote::Failed { message }) => {
                info!(%message, "Primary provider could not convert, falling back");
            }
            Err(e) => warn!(error = %e, "Primary provider failed, falling back"),
        }
        self.secondary.convert(to, from, amount).await
    }
}
