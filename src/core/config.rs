use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::providers::profile::ProviderProfile;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    pub url: Option<String>,
}

fn default_catalog_path() -> String {
    "stonks.csv".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            path: default_catalog_path(),
            url: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LanguagesConfig {
    pub path: Option<String>,
    pub default: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub access_key: Option<String>,
}

impl ProviderSettings {
    fn with_base_url(base_url: &str) -> Self {
        ProviderSettings {
            base_url: base_url.to_string(),
            access_key: None,
        }
    }

    /// Returns the configured credential, or a configuration error naming
    /// both places it can be set.
    pub fn require_access_key(&self, profile: &ProviderProfile) -> Result<&str> {
        self.access_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "Missing access key for {}: set {} or providers.{}.access_key",
                    profile.name,
                    profile.key_env,
                    profile.name
                )
            })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    #[serde(default = "default_fixer")]
    pub fixer: ProviderSettings,
    #[serde(default = "default_currency_layer")]
    pub currencylayer: ProviderSettings,
}

fn default_fixer() -> ProviderSettings {
    ProviderSettings::with_base_url("http://data.fixer.io/api")
}

fn default_currency_layer() -> ProviderSettings {
    ProviderSettings::with_base_url("http://api.currencylayer.com")
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            fixer: default_fixer(),
            currencylayer: default_currency_layer(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub languages: LanguagesConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_reference_currency")]
    pub reference_currency: String,
}

fn default_reference_currency() -> String {
    "EUR".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            catalog: CatalogConfig::default(),
            languages: LanguagesConfig::default(),
            providers: ProvidersConfig::default(),
            reference_currency: default_reference_currency(),
        }
    }
}

impl AppConfig {
    /// Loads the config from `path`, or from the default location when it
    /// exists, or falls back to built-in defaults. Environment credentials
    /// are applied on top.
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with credentials resolved through `lookup`.
    pub fn load_with_env<F>(path: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let default_path = Self::default_config_path()?;
                if default_path.exists() {
                    Self::load_from_path(&default_path)?
                } else {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_env_overrides(lookup);
        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "stonks", "stonks")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Credentials from the environment win over the file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fixer = ProviderProfile::fixer();
        let currency_layer = ProviderProfile::currency_layer();
        if let Some(key) = lookup(fixer.key_env) {
            debug!(provider = fixer.name, "Using access key from environment");
            self.providers.fixer.access_key = Some(key);
        }
        if let Some(key) = lookup(currency_layer.key_env) {
            debug!(provider = currency_layer.name, "Using access key from environment");
            self.providers.currencylayer.access_key = Some(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
catalog:
  path: "data/currencies.csv"
  url: "https://example.com/stonks.csv"
languages:
  path: "languages.csv"
  default: "sw"
providers:
  fixer:
    base_url: "http://example.com/fixer"
    access_key: "fixer-file-key"
  currencylayer:
    base_url: "http://example.com/cl"
reference_currency: "USD"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.catalog.path, "data/currencies.csv");
        assert_eq!(
            config.catalog.url.as_deref(),
            Some("https://example.com/stonks.csv")
        );
        assert_eq!(config.languages.path.as_deref(), Some("languages.csv"));
        assert_eq!(config.languages.default.as_deref(), Some("sw"));
        assert_eq!(config.providers.fixer.base_url, "http://example.com/fixer");
        assert_eq!(
            config.providers.fixer.access_key.as_deref(),
            Some("fixer-file-key")
        );
        assert_eq!(config.providers.currencylayer.base_url, "http://example.com/cl");
        assert!(config.providers.currencylayer.access_key.is_none());
        assert_eq!(config.reference_currency, "USD");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.catalog.path, "stonks.csv");
        assert!(config.catalog.url.is_none());
        assert_eq!(config.providers.fixer.base_url, "http://data.fixer.io/api");
        assert_eq!(
            config.providers.currencylayer.base_url,
            "http://api.currencylayer.com"
        );
        assert_eq!(config.reference_currency, "EUR");
    }

    #[test]
    fn test_env_overrides_credentials() {
        let mut config: AppConfig = serde_yaml::from_str(
            r#"
providers:
  fixer:
    base_url: "http://example.com/fixer"
    access_key: "from-file"
"#,
        )
        .unwrap();

        config.apply_env_overrides(|key| match key {
            "FIXER_KEY" => Some("from-env".to_string()),
            "CL_KEY" => Some("cl-from-env".to_string()),
            _ => None,
        });
        assert_eq!(config.providers.fixer.access_key.as_deref(), Some("from-env"));
        assert_eq!(
            config.providers.currencylayer.access_key.as_deref(),
            Some("cl-from-env")
        );

        let mut config = AppConfig::default();
        config.apply_env_overrides(|_| None);
        assert!(config.providers.fixer.access_key.is_none());
    }

    #[test]
    fn test_missing_access_key_is_an_error() {
        let settings = ProviderSettings::with_base_url("http://example.com");
        let err = settings
            .require_access_key(&ProviderProfile::currency_layer())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing access key for currencylayer: set CL_KEY or providers.currencylayer.access_key"
        );

        let blank = ProviderSettings {
            base_url: "http://example.com".to_string(),
            access_key: Some("  ".to_string()),
        };
        assert!(blank.require_access_key(&ProviderProfile::fixer()).is_err());

        let set = ProviderSettings {
            base_url: "http://example.com".to_string(),
            access_key: Some("abc".to_string()),
        };
        assert_eq!(set.require_access_key(&ProviderProfile::fixer()).unwrap(), "abc");
    }

    #[test]
    fn test_load_with_env_uses_injected_lookup() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            "providers:\n  fixer:\n    base_url: \"http://localhost\"\n    access_key: \"file\"\n",
        )
        .unwrap();
        let path = config_path.to_str();

        let config = AppConfig::load_with_env(path, |_| None).unwrap();
        assert_eq!(config.providers.fixer.access_key.as_deref(), Some("file"));
        assert_eq!(config.providers.currencylayer.access_key, None);

        let config = AppConfig::load_with_env(path, |key| match key {
            "CL_KEY" => Some("from-env".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.providers.fixer.access_key.as_deref(), Some("file"));
        assert_eq!(
            config.providers.currencylayer.access_key.as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let err = AppConfig::load(Some("/nonexistent/stonks/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
