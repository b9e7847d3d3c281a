use super::convert::UnknownCurrencyPolicy;
use super::rates::DEFAULT_BASE_CURRENCY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ProviderConfig {
    /// Full URL of the "latest rates" endpoint for `base_currency`.
    pub fn endpoint(&self, base_currency: &str) -> String {
        format!(
            "{}/v6/{}/latest/{}",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            base_currency
        )
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SelectionDefaults {
    pub from: String,
    pub to: String,
}

impl Default for SelectionDefaults {
    fn default() -> Self {
        SelectionDefaults {
            from: "USD".to_string(),
            to: "IDR".to_string(),
        }
    }
}

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub defaults: SelectionDefaults,
    #[serde(default)]
    pub unknown_currency: UnknownCurrencyPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path).context("Run `fxconv setup` to create a configuration")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxconv", "fxconv")
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

    pub fn endpoint(&self) -> String {
        self.provider.endpoint(&self.base_currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "https://v6.exchangerate-api.com"
  api_key: "secret"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.api_key, "secret");
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.defaults, SelectionDefaults::default());
        assert_eq!(config.unknown_currency, UnknownCurrencyPolicy::Fallback);
        assert_eq!(
            config.endpoint(),
            "https://v6.exchangerate-api.com/v6/secret/latest/USD"
        );

        let yaml_str_full = r#"
provider:
  base_url: "http://localhost:8080/"
  api_key: "abc"
base_currency: "EUR"
defaults:
  from: "EUR"
  to: "JPY"
unknown_currency: reject
        "#;
        let config: AppConfig = serde_yaml::from_str(yaml_str_full).unwrap();
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.defaults.from, "EUR");
        assert_eq!(config.defaults.to, "JPY");
        assert_eq!(config.unknown_currency, UnknownCurrencyPolicy::Reject);
        assert_eq!(config.endpoint(), "http://localhost:8080/v6/abc/latest/EUR");
    }

    #[test]
    fn test_config_requires_provider() {
        let result: std::result::Result<AppConfig, _> =
            serde_yaml::from_str("base_currency: \"USD\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/fxconv/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
