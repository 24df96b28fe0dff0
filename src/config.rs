// src/config.rs
use crate::analysis::prompt;
use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 20_000;
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Everything the offer analysis adapter needs, injected at startup.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    pub system_instruction: String,
    pub response_schema: serde_json::Value,
    pub temperature: f32,
    pub timeout: Duration,
    pub min_text_chars: usize,
    pub max_text_chars: usize,
    pub max_image_bytes: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_instruction: prompt::SYSTEM_INSTRUCTION.to_string(),
            response_schema: prompt::response_schema(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl AdapterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_text_limits(mut self, min_chars: usize, max_chars: usize) -> Self {
        self.min_text_chars = min_chars;
        self.max_text_chars = max_chars;
        self
    }

    pub fn with_max_image_bytes(mut self, max_bytes: usize) -> Self {
        self.max_image_bytes = max_bytes;
        self
    }

    /// Check the configuration once, before any request is made.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "model",
                reason: "model identifier must not be empty".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout_seconds",
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        if self.min_text_chars == 0 || self.max_text_chars < self.min_text_chars {
            return Err(ConfigError::InvalidValue {
                field: "min_text_chars",
                reason: format!(
                    "text limits must satisfy 1 <= min ({}) <= max ({})",
                    self.min_text_chars, self.max_text_chars
                ),
            });
        }

        if self.max_image_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_image_bytes",
                reason: "image size limit must be greater than zero".to_string(),
            });
        }

        if !self.response_schema.is_object() {
            return Err(ConfigError::InvalidValue {
                field: "response_schema",
                reason: "response schema must be a JSON object".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid_once_key_is_set() {
        assert!(matches!(
            AdapterConfig::default().validate(),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(AdapterConfig::new("secret").validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = AdapterConfig::new("k").with_temperature(3.5).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "temperature", .. }));

        let err = AdapterConfig::new("k")
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "timeout_seconds", .. }));

        let err = AdapterConfig::new("k").with_text_limits(100, 10).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "min_text_chars", .. }));

        let err = AdapterConfig::new("k").with_model("  ").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "model", .. }));
    }
}
