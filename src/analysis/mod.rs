// src/analysis/mod.rs
pub mod adapter;
pub mod gemini_client;
pub mod prompt;
pub mod types;
pub mod validator;

pub use adapter::{initialize, OfferAnalysisAdapter};
pub use gemini_client::{GeminiClient, GenerativeModel};
pub use types::GenerateContentRequest;
