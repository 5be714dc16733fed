use super::currency::CurrencyCode;
use super::quote::ResponsePolicy;
use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const SERVICE_URL_ENV: &str = "BRIDGE_SERVICE_URL";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefaultsConfig {
    pub from: String,
    pub to: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: "BTC".to_string(),
            to: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub validate_amounts: bool,
    #[serde(default)]
    pub strict_convert: bool,
}

impl AppConfig {
    /// Loads the default config file if there is one, then applies environment overrides.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            debug!("No config at {}, using defaults", config_path.display());
            Self::default()
        };
        Ok(config.with_env_overrides(std::env::var(SERVICE_URL_ENV).ok()))
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "bridge", "bridge")
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
        if self.service.timeout_secs == 0 {
            bail!("`service.timeout_secs` must be at least 1");
        }
        Ok(())
    }

    pub fn with_env_overrides(mut self, service_url: Option<String>) -> Self {
        if let Some(url) = service_url.filter(|u| !u.trim().is_empty()) {
            debug!("Using service url from {SERVICE_URL_ENV}");
            self.service.base_url = Some(url);
        }
        self
    }

    pub fn service_base_url(&self) -> Result<&str> {
        self.service.base_url.as_deref().ok_or_else(|| {
            anyhow!(
                "No quote service configured. Set `service.base_url` in the config file or {SERVICE_URL_ENV}"
            )
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    pub fn response_policy(&self) -> ResponsePolicy {
        if self.strict_convert {
            ResponsePolicy::Strict
        } else {
            ResponsePolicy::Lenient
        }
    }

    pub fn default_from(&self) -> Result<CurrencyCode> {
        CurrencyCode::parse(&self.defaults.from).context("Invalid `defaults.from` currency")
    }

    pub fn default_to(&self) -> Result<CurrencyCode> {
        CurrencyCode::parse(&self.defaults.to).context("Invalid `defaults.to` currency")
    }
}
