use offer_guard::analysis::types::GenerateContentRequest;
use offer_guard::analysis::GenerativeModel;
use offer_guard::{build_rocket, AdapterConfig, AnalysisError, OfferAnalysisAdapter, ServerSettings};
use offer_guard::ANALYSIS_FAILED_MESSAGE;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;

const BOUNDARY: &str = "offer-boundary-7d1f";

const OFFER_TEXT: &str = "We are happy to offer you the role of Backend Engineer at Initech. \
    Your manager will be Bill Lumbergh and the start date is March 3rd.";

struct StaticModel(Result<String, AnalysisError>);

impl GenerativeModel for StaticModel {
    fn generate<'a>(
        &'a self,
        _model: &'a str,
        _request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AnalysisError>> + Send + 'a>> {
        let reply = self.0.clone();
        Box::pin(async move { reply })
    }
}

fn genuine_output() -> String {
    json!({
        "isGenuine": true,
        "reason": "Specific role, manager and start date",
        "keyIndicators": [
            {"indicator": "Vague Details", "status": "Pass", "details": "Names the manager"}
        ]
    })
    .to_string()
}

async fn client_with(reply: Result<String, AnalysisError>) -> Client {
    client_for(AdapterConfig::new("test-key"), reply).await
}

async fn client_for(config: AdapterConfig, reply: Result<String, AnalysisError>) -> Client {
    let adapter = OfferAnalysisAdapter::with_model(config, StaticModel(reply));
    let settings = ServerSettings {
        port: 8000,
        log_file: None,
    };
    Client::tracked(build_rocket(adapter, &settings))
        .await
        .expect("valid rocket instance")
}

fn multipart_body(filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_type() -> ContentType {
    ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY))
}

#[rocket::async_test]
async fn test_health() {
    let client = client_with(Ok(genuine_output())).await;
    let response = client.get("/api/health").dispatch().await;

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("gemini-2.5-flash"));
}

#[rocket::async_test]
async fn test_analyze_text() {
    let client = client_with(Ok(genuine_output())).await;
    let response = client
        .post("/api/analyze/text")
        .header(ContentType::JSON)
        .body(json!({ "text": OFFER_TEXT, "conversation_id": "conv-1" }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["type"], "data");
    assert_eq!(body["conversation_id"], "conv-1");
    assert_eq!(body["data"]["input_kind"], "text");
    assert_eq!(body["data"]["result"]["isGenuine"], true);
    assert_eq!(
        body["data"]["result"]["keyIndicators"][0]["indicator"],
        "Vague Details"
    );
    assert!(!body["data"]["analysis_id"].as_str().unwrap().is_empty());
}

#[rocket::async_test]
async fn test_short_text_is_bad_request() {
    let client = client_with(Ok(genuine_output())).await;
    let response = client
        .post("/api/analyze/text")
        .header(ContentType::JSON)
        .body(json!({ "text": "hi" }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "INVALID_INPUT");
    assert_eq!(body["error"], ANALYSIS_FAILED_MESSAGE);
}

#[rocket::async_test]
async fn test_model_failure_uses_fixed_message() {
    let client = client_with(Err(AnalysisError::Transport(
        "upstream returned 503 with secret details".to_string(),
    )))
    .await;

    let response = client
        .post("/api/analyze/text")
        .header(ContentType::JSON)
        .body(json!({ "text": OFFER_TEXT }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadGateway);
    let body = response.into_string().await.unwrap();
    assert!(body.contains(ANALYSIS_FAILED_MESSAGE));
    assert!(!body.contains("secret details"));
}

#[rocket::async_test]
async fn test_analyze_image() {
    let client = client_with(Ok(genuine_output())).await;
    let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D];

    let response = client
        .post("/api/analyze/image")
        .header(multipart_type())
        .body(multipart_body("offer.png", "image/png", &png))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["data"]["input_kind"], "image");
    assert_eq!(body["data"]["result"]["isGenuine"], true);
}

#[rocket::async_test]
async fn test_unsupported_image_type() {
    let client = client_with(Ok(genuine_output())).await;

    let response = client
        .post("/api/analyze/image")
        .header(multipart_type())
        .body(multipart_body("offer.gif", "image/gif", b"GIF89a...."))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::UnsupportedMediaType);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "INVALID_FORMAT");
}

#[rocket::async_test]
async fn test_mismatched_image_content() {
    let client = client_with(Ok(genuine_output())).await;
    let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

    let response = client
        .post("/api/analyze/image")
        .header(multipart_type())
        .body(multipart_body("offer.png", "image/png", &jpeg))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::UnsupportedMediaType);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "IMAGE_WRONG_FORMAT");
}

#[rocket::async_test]
async fn test_oversized_upload_is_rejected() {
    let config = AdapterConfig::new("test-key").with_max_image_bytes(1024);
    let client = client_for(config, Ok(genuine_output())).await;

    let mut png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    png.resize(4096, 0);

    let response = client
        .post("/api/analyze/image")
        .header(multipart_type())
        .body(multipart_body("offer.png", "image/png", &png))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::PayloadTooLarge);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "FILE_TOO_LARGE");
    assert_eq!(body["success"], false);
}

#[rocket::async_test]
async fn test_unparseable_json_is_bad_request() {
    let client = client_with(Ok(genuine_output())).await;
    let response = client
        .post("/api/analyze/text")
        .header(ContentType::JSON)
        .body("{\"text\": \"unterminated")
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "BAD_REQUEST");
    assert_eq!(body["type"], "error");
}

#[rocket::async_test]
async fn test_wrongly_typed_json_is_unprocessable() {
    let client = client_with(Ok(genuine_output())).await;
    let response = client
        .post("/api/analyze/text")
        .header(ContentType::JSON)
        .body(json!({ "text": 42 }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "UNPROCESSABLE_ENTITY");
}
