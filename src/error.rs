// src/error.rs
use thiserror::Error;

/// Message shown to end users for every analysis failure. Detailed causes only go to logs.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to get analysis from AI. The model may be unable to process the request. Please try again.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Schema violation at `{field}`: {problem}")]
    SchemaViolation { field: String, problem: String },
}

impl AnalysisError {
    pub fn schema(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            problem: problem.into(),
        }
    }

    /// The fixed, human-readable message for display.
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILED_MESSAGE
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::SchemaViolation { .. } => "SCHEMA_VIOLATION",
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API_KEY environment variable not set")]
    MissingApiKey,

    #[error("Invalid configuration value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to load configuration file {path}: {reason}")]
    File { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_variants_share_user_message() {
        let errors = [
            AnalysisError::InvalidInput("empty".to_string()),
            AnalysisError::Transport("connection refused".to_string()),
            AnalysisError::MalformedResponse("eof".to_string()),
            AnalysisError::schema("isGenuine", "missing"),
        ];

        for error in &errors {
            assert_eq!(error.user_message(), ANALYSIS_FAILED_MESSAGE);
        }
    }

    #[test]
    fn test_codes_keep_internal_distinctions() {
        assert_eq!(AnalysisError::InvalidInput(String::new()).code(), "INVALID_INPUT");
        assert_eq!(AnalysisError::Transport(String::new()).code(), "TRANSPORT_ERROR");
        assert_eq!(
            AnalysisError::MalformedResponse(String::new()).code(),
            "MALFORMED_RESPONSE"
        );
        assert_eq!(AnalysisError::schema("reason", "x").code(), "SCHEMA_VIOLATION");
    }

    #[test]
    fn test_schema_violation_display_names_field() {
        let err = AnalysisError::schema("keyIndicators[2].status", "unknown value \"Maybe\"");
        assert!(err.to_string().contains("keyIndicators[2].status"));
        assert!(err.to_string().contains("Maybe"));
    }
}
