// src/environment.rs
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Per-environment overrides read from the optional YAML config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnvironmentConfig {
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
    pub min_text_chars: Option<usize>,
    pub max_text_chars: Option<usize>,
    pub max_image_bytes: Option<usize>,
    pub port: Option<u16>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentConfig,
    #[serde(default)]
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    pub fn get_environment() -> String {
        std::env::var("OFFERGUARD_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Load the profile for `environment`. A missing file means no overrides.
    pub fn load_from_file(path: &Path, environment: &str) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse(&content, environment).map_err(|reason| ConfigError::File {
            path: path.display().to_string(),
            reason,
        })
    }

    pub fn parse(content: &str, environment: &str) -> Result<Self, String> {
        let config_file: ConfigFile = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }
}
