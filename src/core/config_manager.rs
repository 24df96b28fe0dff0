// src/core/config_manager.rs
//! Layered configuration: defaults, YAML profile, then environment variables.

use crate::config::AdapterConfig;
use crate::environment::EnvironmentConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    /// YAML file the profile was read from, if one existed
    pub config_file: Option<PathBuf>,
    pub adapter: AdapterConfig,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub port: u16,
    pub log_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Load all configuration from the process environment and `config_path`
    pub fn load(config_path: &Path) -> Result<Self> {
        let environment = EnvironmentConfig::get_environment();
        let file = EnvironmentConfig::load_from_file(config_path, &environment)?;

        let mut manager = Self::from_sources(environment, file, |key| std::env::var(key).ok())?;
        if config_path.exists() {
            manager.config_file = Some(config_path.to_path_buf());
        }
        Ok(manager)
    }

    pub fn from_sources<F>(environment: String, file: EnvironmentConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let adapter = Self::load_adapter(&file, &lookup)?;
        let server = Self::load_server(&file, &lookup)?;

        Ok(Self {
            environment,
            config_file: None,
            adapter,
            server,
        })
    }

    /// One-line summary of where configuration came from, logged once tracing is up
    pub fn describe(&self) -> String {
        let source = match &self.config_file {
            Some(path) => format!("profile from {}", path.display()),
            None => "no config file, built-in defaults".to_string(),
        };

        format!(
            "Configuration loaded for environment {} ({}; model: {}, timeout: {}s, port: {})",
            self.environment,
            source,
            self.adapter.model,
            self.adapter.timeout.as_secs(),
            self.server.port
        )
    }

    fn load_adapter<F>(file: &EnvironmentConfig, lookup: &F) -> Result<AdapterConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AdapterConfig::default();

        if let Some(model) = &file.model {
            config.model = model.clone();
        }
        if let Some(url) = &file.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(temperature) = file.temperature {
            config.temperature = temperature;
        }
        if let Some(seconds) = file.timeout_seconds {
            config.timeout = Duration::from_secs(seconds);
        }
        if let Some(min) = file.min_text_chars {
            config.min_text_chars = min;
        }
        if let Some(max) = file.max_text_chars {
            config.max_text_chars = max;
        }
        if let Some(max) = file.max_image_bytes {
            config.max_image_bytes = max;
        }

        // Absence is reported by `initialize`, which aborts startup.
        config.api_key = lookup("API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .unwrap_or_default();

        if let Some(model) = lookup("GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(url) = lookup("GEMINI_API_URL") {
            config.api_base_url = url;
        }
        if let Some(seconds) = lookup("GEMINI_TIMEOUT_SECONDS") {
            let seconds = seconds
                .parse::<u64>()
                .context("GEMINI_TIMEOUT_SECONDS must be a whole number of seconds")?;
            config.timeout = Duration::from_secs(seconds);
        }

        Ok(config)
    }

    fn load_server<F>(file: &EnvironmentConfig, lookup: &F) -> Result<ServerSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("ROCKET_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };

        let log_file = lookup("OFFERGUARD_LOG_FILE")
            .map(PathBuf::from)
            .or_else(|| file.log_file.clone());

        Ok(ServerSettings { port, log_file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file() {
        let manager = ConfigManager::from_sources(
            "local".to_string(),
            EnvironmentConfig::default(),
            env(&[("API_KEY", "secret")]),
        )
        .unwrap();

        assert_eq!(manager.adapter.api_key, "secret");
        assert_eq!(manager.adapter.model, crate::config::DEFAULT_MODEL);
        assert_eq!(manager.server.port, DEFAULT_PORT);
        assert_eq!(manager.server.log_file, None);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = EnvironmentConfig {
            model: Some("gemini-2.5-pro".to_string()),
            timeout_seconds: Some(15),
            port: Some(9000),
            ..Default::default()
        };

        let manager = ConfigManager::from_sources(
            "production".to_string(),
            file,
            env(&[
                ("GEMINI_API_KEY", "fallback-key"),
                ("GEMINI_MODEL", "gemini-2.0-flash"),
                ("ROCKET_PORT", "7000"),
            ]),
        )
        .unwrap();

        assert_eq!(manager.adapter.api_key, "fallback-key");
        assert_eq!(manager.adapter.model, "gemini-2.0-flash");
        assert_eq!(manager.adapter.timeout, Duration::from_secs(15));
        assert_eq!(manager.server.port, 7000);
    }

    #[test]
    fn test_missing_key_is_left_for_initialize() {
        let manager =
            ConfigManager::from_sources("local".to_string(), EnvironmentConfig::default(), env(&[]))
                .unwrap();
        assert!(manager.adapter.api_key.is_empty());
        assert!(crate::analysis::initialize(manager.adapter).is_err());
    }

    #[test]
    fn test_describe_reports_source() {
        let mut manager = ConfigManager::from_sources(
            "production".to_string(),
            EnvironmentConfig::default(),
            env(&[("API_KEY", "k")]),
        )
        .unwrap();

        let summary = manager.describe();
        assert!(summary.contains("environment production"));
        assert!(summary.contains("built-in defaults"));
        assert!(summary.contains(crate::config::DEFAULT_MODEL));

        manager.config_file = Some(PathBuf::from("/etc/offerguard/config.yaml"));
        assert!(manager.describe().contains("profile from /etc/offerguard/config.yaml"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = ConfigManager::from_sources(
            "local".to_string(),
            EnvironmentConfig::default(),
            env(&[("API_KEY", "k"), ("ROCKET_PORT", "not-a-port")]),
        );
        assert!(result.is_err());
    }
}
