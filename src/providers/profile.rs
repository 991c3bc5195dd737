//! Wire conventions of the supported rate providers.
//!
//! Both providers expose the same two operations and differ only in naming,
//! so each is described as data instead of a separate client type.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateKeys {
    /// `{"EUR": 0.92}`
    Plain,
    /// `{"USDEUR": 0.92}`, prefixed with the value of the base field
    SourcePrefixed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub name: &'static str,
    pub key_env: &'static str,
    pub latest_path: &'static str,
    pub convert_path: &'static str,
    pub symbols_param: &'static str,
    pub rates_field: &'static str,
    pub base_field: &'static str,
    /// Base assumed when a response omits the base field.
    pub default_base: &'static str,
    pub rate_keys: RateKeys,
}

impl ProviderProfile {
    pub const fn fixer() -> Self {
        ProviderProfile {
            name: "fixer",
            key_env: "FIXER_KEY",
            latest_path: "/latest",
            convert_path: "/convert",
            symbols_param: "symbols",
            rates_field: "rates",
            base_field: "base",
            default_base: "EUR",
            rate_keys: RateKeys::Plain,
        }
    }

    pub const fn currency_layer() -> Self {
        ProviderProfile {
            name: "currencylayer",
            key_env: "CL_KEY",
            latest_path: "/live",
            convert_path: "/convert",
            symbols_param: "currencies",
            rates_field: "quotes",
            base_field: "source",
            default_base: "USD",
            rate_keys: RateKeys::SourcePrefixed,
        }
    }

    /// Maps a wire rate key back to a plain currency code.
    pub fn code_from_key<'a>(&self, key: &'a str, base: &str) -> Option<&'a str> {
        match self.rate_keys {
            RateKeys::Plain => Some(key),
            RateKeys::SourcePrefixed => key.strip_prefix(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_from_key() {
        let fixer = ProviderProfile::fixer();
        assert_eq!(fixer.code_from_key("GBP", "EUR"), Some("GBP"));

        let cl = ProviderProfile::currency_layer();
        assert_eq!(cl.code_from_key("USDGBP", "USD"), Some("GBP"));
        assert_eq!(cl.code_from_key("USDUSD", "USD"), Some("USD"));
        assert_eq!(cl.code_from_key("EURGBP", "USD"), None);
        assert_eq!(cl.code_from_key("USDGBP", cl.default_base), Some("GBP"));
    }
}
