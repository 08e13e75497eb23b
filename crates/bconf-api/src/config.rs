use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use bconf_build::NamingOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Overrides every other way of choosing the API endpoint
pub const API_URL_ENV: &str = "BCONF_API_URL";
/// Selects a named environment when no explicit URL is configured
pub const ENVIRONMENT_ENV: &str = "BCONF_ENV";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
    Staging,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:8000",
            Environment::Production => "https://bconf.onrender.com",
            Environment::Staging => "https://bconf-staging.onrender.com",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
            Environment::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown environment '{0}' (expected development, production or staging)")]
pub struct UnknownEnvironment(String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

/// User settings from `~/.bconf/config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

pub fn config_file_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home_dir.join(".bconf").join("config.toml"))
}

impl Config {
    /// Load the user config; a missing file is an empty config
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Environment chosen by `BCONF_ENV`, then the config file, then production
    pub fn environment(&self) -> Result<Environment> {
        resolve_environment(std::env::var(ENVIRONMENT_ENV).ok().as_deref(), self)
    }

    /// Endpoint chosen by `BCONF_API_URL`, then `api_url`, then the environment
    pub fn api_base_url(&self) -> Result<String> {
        resolve_api_base_url(
            std::env::var(API_URL_ENV).ok().as_deref(),
            std::env::var(ENVIRONMENT_ENV).ok().as_deref(),
            self,
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn naming_options(&self) -> NamingOptions {
        match self.brand.as_deref().map(str::trim) {
            Some(brand) if !brand.is_empty() => NamingOptions::with_brand(brand),
            _ => NamingOptions::default(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn resolve_environment(env_var: Option<&str>, config: &Config) -> Result<Environment> {
    match non_empty(env_var) {
        Some(name) => name
            .parse()
            .with_context(|| format!("Invalid {ENVIRONMENT_ENV}")),
        None => Ok(config.environment.unwrap_or_default()),
    }
}

fn resolve_api_base_url(
    url_var: Option<&str>,
    env_var: Option<&str>,
    config: &Config,
) -> Result<String> {
    let url = match non_empty(url_var).or(non_empty(config.api_url.as_deref())) {
        Some(url) => url.to_string(),
        None => resolve_environment(env_var, config)?.base_url().to_string(),
    };
    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_precedence() {
        let empty = Config::default();
        assert_eq!(
            resolve_api_base_url(None, None, &empty).unwrap(),
            "https://bconf.onrender.com"
        );
        assert_eq!(
            resolve_api_base_url(None, Some("development"), &empty).unwrap(),
            "http://localhost:8000"
        );

        let configured = Config {
            environment: Some(Environment::Staging),
            api_url: Some("http://catalog.local:9000/".into()),
            ..Config::default()
        };
        assert_eq!(
            resolve_api_base_url(None, Some("development"), &configured).unwrap(),
            "http://catalog.local:9000"
        );
        assert_eq!(
            resolve_api_base_url(Some("http://override"), None, &configured).unwrap(),
            "http://override"
        );

        let staging = Config {
            environment: Some(Environment::Staging),
            ..Config::default()
        };
        assert_eq!(
            resolve_api_base_url(Some("  "), None, &staging).unwrap(),
            "https://bconf-staging.onrender.com"
        );
    }

    #[test]
    fn test_bad_environment_is_an_error() {
        let err = resolve_environment(Some("qa"), &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown environment 'qa'"));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        fs::write(
            &path,
            "environment = \"development\"\nbrand = \"Acme\"\ntimeout_secs = 5\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.environment, Some(Environment::Development));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.naming_options().brand, "Acme");

        fs::write(&path, "environment = \"moon\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.naming_options(), NamingOptions::default());
        assert_eq!("Prod".parse::<Environment>(), Ok(Environment::Production));
    }
}
