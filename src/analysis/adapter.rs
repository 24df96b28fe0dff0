// src/analysis/adapter.rs
use super::gemini_client::{GeminiClient, GenerativeModel};
use super::prompt;
use super::types::GenerateContentRequest;
use super::validator;
use crate::config::AdapterConfig;
use crate::error::{AnalysisError, ConfigError};
use crate::image_validator::ImageValidator;
use crate::types::{AnalysisInput, AnalysisResult};
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};

/// Turns one offer letter into a validated verdict via a remote generative model.
///
/// Holds only immutable configuration and the model handle, so a single
/// instance can serve any number of concurrent callers.
pub struct OfferAnalysisAdapter {
    config: AdapterConfig,
    model: Box<dyn GenerativeModel>,
}

/// Validate configuration and build the adapter backed by the Gemini API.
/// Called once by the hosting application at startup.
pub fn initialize(config: AdapterConfig) -> Result<OfferAnalysisAdapter, ConfigError> {
    config.validate()?;

    let client = GeminiClient::new(&config.api_key, &config.api_base_url, config.timeout)?;

    info!(
        "Offer analysis adapter ready (model: {}, timeout: {}s)",
        config.model,
        config.timeout.as_secs()
    );

    Ok(OfferAnalysisAdapter::with_model(config, client))
}

impl OfferAnalysisAdapter {
    pub fn with_model(config: AdapterConfig, model: impl GenerativeModel + 'static) -> Self {
        Self {
            config,
            model: Box::new(model),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    /// Reject inputs that must never reach the remote service
    pub fn check_input(&self, input: &AnalysisInput) -> Result<(), AnalysisError> {
        match input {
            AnalysisInput::Image { bytes, mime_type } => {
                ImageValidator::validate(bytes, Some(*mime_type), self.config.max_image_bytes)
                    .map(|_| ())
                    .map_err(|e| AnalysisError::InvalidInput(e.message))
            }
            AnalysisInput::Text { content } => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    return Err(AnalysisError::InvalidInput(
                        "offer letter text is empty".to_string(),
                    ));
                }

                let chars = trimmed.chars().count();
                if chars < self.config.min_text_chars {
                    return Err(AnalysisError::InvalidInput(format!(
                        "offer letter text must contain at least {} characters, got {}",
                        self.config.min_text_chars, chars
                    )));
                }
                if chars > self.config.max_text_chars {
                    return Err(AnalysisError::InvalidInput(format!(
                        "offer letter text exceeds {} characters ({})",
                        self.config.max_text_chars, chars
                    )));
                }

                Ok(())
            }
        }
    }

    pub fn build_request(&self, input: &AnalysisInput) -> GenerateContentRequest {
        prompt::build_request(&self.config, input)
    }

    /// Analyze one offer letter. One call in, one result or one error out.
    pub async fn analyze(&self, input: AnalysisInput) -> Result<AnalysisResult, AnalysisError> {
        let span = info_span!("analyze_offer", input = input.kind(), model = %self.config.model);

        async move {
            let started = Instant::now();
            let outcome = self.run(&input).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &outcome {
                Ok(result) => info!(
                    is_genuine = result.is_genuine,
                    indicators = result.indicators.len(),
                    elapsed_ms,
                    "Offer analysis completed"
                ),
                Err(e) if e.is_invalid_input() => {
                    warn!(code = e.code(), "Offer analysis rejected input: {}", e)
                }
                Err(e) => error!(code = e.code(), elapsed_ms, "Offer analysis failed: {}", e),
            }

            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(&self, input: &AnalysisInput) -> Result<AnalysisResult, AnalysisError> {
        self.check_input(input)?;

        let request = self.build_request(input);
        let timeout = self.config.timeout;

        let raw = tokio::time::timeout(timeout, self.model.generate(&self.config.model, &request))
            .await
            .map_err(|_| {
                AnalysisError::Transport(format!(
                    "model call timed out after {} ms",
                    timeout.as_millis()
                ))
            })??;

        validator::parse_model_output(&raw)
    }
}
