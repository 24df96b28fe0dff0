// src/web/handlers/system_handlers.rs
use crate::analysis::OfferAnalysisAdapter;
use crate::web::types::TextResponse;

use rocket::serde::json::Json;
use rocket::State;
use tracing::debug;

pub async fn health_handler(adapter: &State<OfferAnalysisAdapter>) -> Json<TextResponse> {
    debug!("Health check");
    Json(TextResponse::success(
        format!("OK (model: {})", adapter.model_name()),
        None,
    ))
}
