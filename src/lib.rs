//! Offer letter fraud analysis backed by Gemini.
//!
//! [`initialize`] turns an [`AdapterConfig`] into an [`OfferAnalysisAdapter`], whose
//! `analyze` call sends an image or pasted text to the model and returns a validated
//! [`types::AnalysisResult`]. The `web` module exposes the same operation over HTTP.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod core;
pub mod environment;
pub mod error;
pub mod image_validator;
pub mod types;
pub mod utils;
pub mod web;

pub use analysis::{initialize, OfferAnalysisAdapter};
pub use config::AdapterConfig;
pub use core::{ConfigManager, ServerSettings};
pub use error::{AnalysisError, ConfigError, ANALYSIS_FAILED_MESSAGE};
pub use web::{build_rocket, start_web_server};
