// src/web/handlers/analysis_handlers.rs
use crate::analysis::OfferAnalysisAdapter;
use crate::error::AnalysisError;
use crate::image_validator::{ImageErrorType, ImageValidator};
use crate::types::{AnalysisInput, ImageMime};
use crate::utils::get_file_extension;
use crate::web::types::{
    AnalysisData, ApiError, DataResponse, ImageUploadForm, StandardErrorResponse,
    StandardRequest, TextAnalysisRequest, WithConversationId,
};

use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use std::path::Path;
use tracing::{error, info, info_span, warn, Instrument};

pub async fn analyze_text_handler(
    request: Json<StandardRequest<TextAnalysisRequest>>,
    adapter: &State<OfferAnalysisAdapter>,
) -> Result<Json<DataResponse<AnalysisData>>, ApiError> {
    let conversation_id = request.conversation_id();
    let request = request.into_inner();

    info!(
        "Text analysis requested ({} characters)",
        request.data.text.chars().count()
    );

    run_analysis(adapter, AnalysisInput::text(request.data.text), conversation_id).await
}

pub async fn analyze_image_handler(
    mut upload: Form<ImageUploadForm<'_>>,
    adapter: &State<OfferAnalysisAdapter>,
) -> Result<Json<DataResponse<AnalysisData>>, ApiError> {
    let conversation_id = upload.conversation_id.clone();

    let declared = declared_image_type(&upload.file).map_err(|received| {
        StandardErrorResponse::new(
            format!("Only PNG and JPEG images are supported. Received: {}", received),
            "INVALID_FORMAT".to_string(),
            vec![
                "Upload a PNG image (.png)".to_string(),
                "Upload a JPEG image (.jpg, .jpeg)".to_string(),
                "Or paste the offer letter text instead".to_string(),
            ],
            conversation_id.clone(),
        )
        .with_status(Status::UnsupportedMediaType)
    })?;

    let max_bytes = adapter.config().max_image_bytes;
    if upload.file.len() > max_bytes as u64 {
        return Err(StandardErrorResponse::new(
            format!("File size exceeds {}MB limit", max_bytes / (1024 * 1024)),
            "FILE_TOO_LARGE".to_string(),
            vec!["Resize or compress the image and try again".to_string()],
            conversation_id,
        )
        .with_status(Status::PayloadTooLarge));
    }

    let bytes = match read_upload(&mut upload.file).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to read uploaded file: {}", e);
            return Err(StandardErrorResponse::new(
                "Failed to process uploaded file".to_string(),
                "FILE_SAVE_ERROR".to_string(),
                vec!["Try uploading the file again".to_string()],
                conversation_id,
            )
            .with_status(Status::InternalServerError));
        }
    };

    let mime_type = ImageValidator::validate(&bytes, declared, max_bytes).map_err(|e| {
        let status = match e.error_type {
            ImageErrorType::TooLarge => Status::PayloadTooLarge,
            ImageErrorType::WrongFormat => Status::UnsupportedMediaType,
            ImageErrorType::EmptyFile | ImageErrorType::CorruptedFile => Status::BadRequest,
        };
        StandardErrorResponse::new(
            e.message,
            e.error_type.code().to_string(),
            vec![e.suggestion],
            conversation_id.clone(),
        )
        .with_status(status)
    })?;

    info!(
        "Image analysis requested ({} bytes, {})",
        bytes.len(),
        mime_type
    );

    run_analysis(adapter, AnalysisInput::image(bytes, mime_type), conversation_id).await
}

async fn run_analysis(
    adapter: &OfferAnalysisAdapter,
    input: AnalysisInput,
    conversation_id: Option<String>,
) -> Result<Json<DataResponse<AnalysisData>>, ApiError> {
    let analysis_id = uuid::Uuid::new_v4().to_string();
    let input_kind = input.kind();
    let span = info_span!("analysis_request", analysis_id = %analysis_id);

    match adapter.analyze(input).instrument(span).await {
        Ok(result) => {
            let message = if result.is_genuine {
                "Offer letter appears genuine".to_string()
            } else {
                "Offer letter shows signs of fraud".to_string()
            };

            let data = AnalysisData {
                analysis_id,
                analyzed_at: chrono::Utc::now().to_rfc3339(),
                input_kind: input_kind.to_string(),
                model: adapter.model_name().to_string(),
                result,
            };

            Ok(Json(DataResponse::success(message, data, conversation_id)))
        }
        Err(e) => Err(analysis_error_response(&e, adapter, conversation_id)),
    }
}

/// Collapse every adapter failure into the fixed user-facing message.
fn analysis_error_response(
    error: &AnalysisError,
    adapter: &OfferAnalysisAdapter,
    conversation_id: Option<String>,
) -> ApiError {
    if error.is_invalid_input() {
        StandardErrorResponse::new(
            error.user_message().to_string(),
            "INVALID_INPUT".to_string(),
            vec![
                format!(
                    "Paste at least {} characters of the offer letter",
                    adapter.config().min_text_chars
                ),
                "Or upload a PNG or JPEG image of the letter".to_string(),
            ],
            conversation_id,
        )
        .with_status(Status::BadRequest)
    } else {
        StandardErrorResponse::new(
            error.user_message().to_string(),
            "ANALYSIS_FAILED".to_string(),
            vec![
                "Try again in a few moments".to_string(),
                "Contact support if the problem persists".to_string(),
            ],
            conversation_id,
        )
        .with_status(Status::BadGateway)
    }
}

/// Format claimed by the upload: content type first, then file extension.
/// `Err` carries the unsupported type that was received.
fn declared_image_type(file: &TempFile<'_>) -> Result<Option<ImageMime>, String> {
    if let Some(content_type) = file.content_type() {
        if content_type.is_png() {
            return Ok(Some(ImageMime::Png));
        }
        if content_type.is_jpeg() {
            return Ok(Some(ImageMime::Jpeg));
        }
        if content_type.top() == "image" {
            return Err(content_type.to_string());
        }
    }

    let extension = file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str())
        .and_then(get_file_extension);

    match extension {
        Some(ext) => ImageMime::from_extension(&ext)
            .map(Some)
            .ok_or_else(|| format!(".{}", ext)),
        None => Ok(None),
    }
}

async fn read_upload(file: &mut TempFile<'_>) -> anyhow::Result<Vec<u8>> {
    let temp_path =
        std::env::temp_dir().join(format!("offer_upload_{}", uuid::Uuid::new_v4()));

    let bytes = match file.persist_to(&temp_path).await {
        Ok(()) => tokio::fs::read(&temp_path).await,
        Err(e) => Err(e),
    };
    remove_temp_upload(&temp_path).await;

    Ok(bytes?)
}

/// Delete a persisted upload; a path that was never written is not an error.
async fn remove_temp_upload(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => {
            warn!("Failed to remove temporary upload {}: {}", path.display(), e);
            false
        }
    }
}
