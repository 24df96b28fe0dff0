// src/analysis/gemini_client.rs
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::error::{AnalysisError, ConfigError};
use crate::utils::truncate_chars;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const MAX_LOGGED_BODY_CHARS: usize = 500;

/// A remote model that answers one `generateContent` request with raw text.
pub trait GenerativeModel: Send + Sync {
    fn generate<'a>(
        &'a self,
        model: &'a str,
        request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AnalysisError>> + Send + 'a>>;
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn send_request(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, AnalysisError> {
        let url = self.endpoint(model);
        info!("Sending request to Gemini API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Transport(format!("Gemini API request timed out: {}", e))
                } else {
                    AnalysisError::Transport(format!("Failed to send request to Gemini API: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let excerpt = truncate_chars(&body, MAX_LOGGED_BODY_CHARS);
            error!("Gemini API error {}: {}", status, excerpt);
            return Err(AnalysisError::Transport(format!(
                "Gemini API returned error {}: {}",
                status, excerpt
            )));
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            AnalysisError::MalformedResponse(format!("Failed to parse Gemini API envelope: {}", e))
        })?;

        match envelope.text() {
            Some(text) => {
                debug!("Received {} characters of model output", text.len());
                Ok(text)
            }
            None => {
                let reason = envelope
                    .block_reason()
                    .map(|r| format!("prompt blocked: {}", r))
                    .or_else(|| {
                        envelope
                            .candidates
                            .first()
                            .and_then(|c| c.finish_reason.clone())
                            .map(|r| format!("no text, finish reason {}", r))
                    })
                    .unwrap_or_else(|| "response contained no text".to_string());
                warn!("Gemini API returned no usable output: {}", reason);
                Err(AnalysisError::MalformedResponse(reason))
            }
        }
    }
}

impl GenerativeModel for GeminiClient {
    fn generate<'a>(
        &'a self,
        model: &'a str,
        request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AnalysisError>> + Send + 'a>> {
        Box::pin(self.send_request(model, request))
    }
}
