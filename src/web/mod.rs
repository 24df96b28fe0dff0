// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::analysis::OfferAnalysisAdapter;
use crate::core::ServerSettings;
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::{error, info};

/// Extra room for multipart framing and form fields around the file itself
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/analyze/text", format = "json", data = "<request>")]
pub async fn analyze_text(
    request: Json<StandardRequest<TextAnalysisRequest>>,
    adapter: &State<OfferAnalysisAdapter>,
) -> Result<Json<DataResponse<AnalysisData>>, ApiError> {
    handlers::analyze_text_handler(request, adapter).await
}

#[post("/analyze/image", data = "<upload>")]
pub async fn analyze_image(
    upload: Form<ImageUploadForm<'_>>,
    adapter: &State<OfferAnalysisAdapter>,
) -> Result<Json<DataResponse<AnalysisData>>, ApiError> {
    handlers::analyze_image_handler(upload, adapter).await
}

#[get("/health")]
pub async fn health(adapter: &State<OfferAnalysisAdapter>) -> Json<TextResponse> {
    handlers::health_handler(adapter).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Endpoint not found".to_string(),
        "NOT_FOUND".to_string(),
        vec![
            "POST /api/analyze/text with a JSON body".to_string(),
            "POST /api/analyze/image with a multipart form".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body too large".to_string(),
        "FILE_TOO_LARGE".to_string(),
        vec!["Resize or compress the image and try again".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable_entity() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request could not be processed".to_string(),
        "UNPROCESSABLE_ENTITY".to_string(),
        vec![
            "Send `text` for text analysis".to_string(),
            "Send a `file` field for image analysis".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

/// Assemble the rocket instance around a ready adapter
pub fn build_rocket(adapter: OfferAnalysisAdapter, settings: &ServerSettings) -> Rocket<Build> {
    let max_image_bytes = adapter.config().max_image_bytes;
    let max_json_bytes = adapter.config().max_text_chars * 4 + FORM_OVERHEAD_BYTES;

    let limits = Limits::default()
        .limit("file", max_image_bytes.bytes())
        .limit("data-form", (max_image_bytes + FORM_OVERHEAD_BYTES).bytes())
        .limit("json", max_json_bytes.bytes());

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", settings.port))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(adapter)
        .register(
            "/api",
            catchers![
                bad_request,
                not_found,
                payload_too_large,
                unprocessable_entity,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![analyze_text, analyze_image, health, options],
        )
}

// Main server start function
pub async fn start_web_server(adapter: OfferAnalysisAdapter, settings: ServerSettings) -> Result<()> {
    info!("Starting offer analysis API server");
    info!("Model: {}", adapter.model_name());
    info!("Server: http://0.0.0.0:{}", settings.port);

    if let Err(e) = build_rocket(adapter, &settings).launch().await {
        error!("Server terminated with error: {}", e);
        anyhow::bail!("Server error: {}", e);
    }

    Ok(())
}
