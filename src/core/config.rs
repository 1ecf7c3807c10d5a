use crate::core::catalog;
use crate::core::converter::ChartView;
use crate::core::rates::{DEFAULT_HISTORY_DAYS, MAX_HISTORY_DAYS};
use anyhow::{Context, Result, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const FRANKFURTER_BASE_URL: &str = "https://api.frankfurter.app";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub frankfurter: Option<FrankfurterProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            frankfurter: Some(FrankfurterProviderConfig {
                base_url: FRANKFURTER_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub view: ChartView,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            amount: 1.0,
            from: "USD".to_string(),
            to: "IDR".to_string(),
            view: ChartView::Comparison,
        }
    }
}

fn default_history_days() -> u32 {
    DEFAULT_HISTORY_DAYS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            defaults: DefaultsConfig::default(),
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when it does not exist.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxpulse", "fxpulse")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_HISTORY_DAYS).contains(&self.history_days),
            "history_days must be between 1 and {}, got {}",
            MAX_HISTORY_DAYS,
            self.history_days
        );
        for code in [&self.defaults.from, &self.defaults.to] {
            ensure!(
                catalog::normalize_code(code).is_some(),
                "Invalid currency code in defaults: {:?}",
                code
            );
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.providers
            .frankfurter
            .as_ref()
            .map_or(FRANKFURTER_BASE_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  frankfurter:
    base_url: "http://example.com/fx"
defaults:
  amount: 250.0
  from: "EUR"
  to: "JPY"
  view: trend
history_days: 30
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_url(), "http://example.com/fx");
        assert_eq!(config.defaults.amount, 250.0);
        assert_eq!(config.defaults.from, "EUR");
        assert_eq!(config.defaults.to, "JPY");
        assert_eq!(config.defaults.view, ChartView::Trend);
        assert_eq!(config.history_days, 30);
    }

    #[test]
    fn test_config_missing_sections_use_defaults() {
        let yaml_str = r#"
defaults:
  to: "SGD"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_url(), FRANKFURTER_BASE_URL);
        assert_eq!(config.defaults.amount, 1.0);
        assert_eq!(config.defaults.from, "USD");
        assert_eq!(config.defaults.to, "SGD");
        assert_eq!(config.defaults.view, ChartView::Comparison);
        assert_eq!(config.history_days, DEFAULT_HISTORY_DAYS);
    }

    #[test]
    fn test_config_without_frankfurter_falls_back_to_public_api() {
        let yaml_str = r#"
providers:
  frankfurter: ~
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert!(config.providers.frankfurter.is_none());
        assert_eq!(config.base_url(), FRANKFURTER_BASE_URL);
    }

    #[test]
    fn test_validate_rejects_out_of_range_history_days() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.history_days = 100_000_000;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("history_days must be between 1 and 3650"));

        config.history_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_default_codes() {
        let mut config = AppConfig::default();
        config.defaults.to = "EUR&to=JPY".to_string();
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("Invalid currency code")
        );
    }

    #[test]
    fn test_load_from_path_validates() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "history_days: 100000000\n")?;

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
