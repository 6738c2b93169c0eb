//! HTTP API server implementation

use axum::{
    extract::{Json, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::core::config::AppConfig;
use crate::core::models::{LanguageCode, Provider};
use crate::pipeline::Pipeline;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

impl AppState {
    /// State serving `pipeline`
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    fn provider(&self) -> Provider {
        self.pipeline.context().endpoints().config().provider
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
    provider: String,
    engine: String,
    timestamp: String,
}

/// Language detection request
#[derive(Deserialize, ToSchema)]
pub struct DetectRequest {
    /// Input text
    #[serde(default)]
    pub text: String,
}

/// Language detection response (Hugging Face provider shape)
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    /// Language code
    pub detected_language: String,
}

/// Translation request
#[derive(Deserialize, ToSchema)]
pub struct TranslateRequest {
    /// Input text
    #[serde(default)]
    pub text: String,
    /// Source language; detected when absent or `auto`
    pub source: Option<String>,
    /// Target language; the configured target when absent
    pub target: Option<String>,
}

/// Translation response (Hugging Face provider shape)
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    /// Translated text
    pub translated_text: String,
}

/// Katakana conversion request
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KatakanaRequest {
    /// Input text
    #[serde(default)]
    pub text: String,
    /// Source language; detected when absent or `auto`
    pub source_language: Option<String>,
}

/// Katakana conversion response
#[derive(Serialize, ToSchema)]
pub struct KatakanaResponse {
    /// Katakana, or a failure message
    pub katakana: String,
    /// Romaji reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    /// Whether `katakana` holds a real conversion
    pub succeeded: bool,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Short error summary
    pub error: String,
    /// Underlying failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(detect, translate, katakana),
    components(schemas(
        DetectRequest,
        DetectResponse,
        TranslateRequest,
        TranslateResponse,
        KatakanaRequest,
        KatakanaResponse,
        ErrorResponse
    ))
)]
struct ApiDoc;

fn error_response(status: StatusCode, error: &str, details: Option<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details,
        }),
    )
        .into_response()
}

fn missing_text() -> Response {
    error_response(StatusCode::BAD_REQUEST, "No text provided", None)
}

/// Requested language code, ignoring blanks and `auto`
fn requested_language(code: Option<&str>) -> Option<LanguageCode> {
    code.map(str::trim)
        .filter(|c| !c.is_empty() && *c != "auto")
        .map(LanguageCode::new)
}

/// Health check handler
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.provider().to_string(),
        engine: state.pipeline.context().engine().state().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", None)
}

/// Language detection handler
#[utoipa::path(
    post,
    path = "/api/detect",
    request_body = DetectRequest,
    responses(
        (status = 200, description = "Detected language", body = DetectResponse),
        (status = 400, description = "No text provided", body = ErrorResponse)
    )
)]
async fn detect(State(state): State<Arc<AppState>>, Json(payload): Json<DetectRequest>) -> Response {
    if payload.text.trim().is_empty() {
        return missing_text();
    }

    let language = state.pipeline.detector().detect(&payload.text).await;

    match state.provider() {
        Provider::HuggingFace => Json(DetectResponse {
            detected_language: language.to_string(),
        })
        .into_response(),
        Provider::Google => Json(json!({
            "data": { "detections": [[{ "language": language.as_str() }]] }
        }))
        .into_response(),
    }
}

/// Translation handler
#[utoipa::path(
    post,
    path = "/api/translate",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translated text", body = TranslateResponse),
        (status = 400, description = "No text provided", body = ErrorResponse),
        (status = 500, description = "Every translation route failed", body = ErrorResponse)
    )
)]
async fn translate(State(state): State<Arc<AppState>>, Json(payload): Json<TranslateRequest>) -> Response {
    if payload.text.trim().is_empty() {
        return missing_text();
    }

    let source = match requested_language(payload.source.as_deref()) {
        Some(source) => source,
        None => state.pipeline.detector().detect(&payload.text).await,
    };
    let target = requested_language(payload.target.as_deref())
        .unwrap_or_else(|| state.pipeline.context().target_language().clone());

    let result = state
        .pipeline
        .translator()
        .translate_to(&payload.text, &source, &target)
        .await;

    if !result.succeeded {
        warn!("Translation failed for {} -> {}: {}", source, target, result.text);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Translation failed",
            Some(result.text),
        );
    }

    match state.provider() {
        Provider::HuggingFace => Json(TranslateResponse {
            translated_text: result.text,
        })
        .into_response(),
        Provider::Google => Json(json!({
            "data": {
                "translations": [{
                    "translatedText": result.text,
                    "detectedSourceLanguage": result.source_language.as_str(),
                }]
            }
        }))
        .into_response(),
    }
}

/// Katakana conversion handler
#[utoipa::path(
    post,
    path = "/api/katakana",
    request_body = KatakanaRequest,
    responses(
        (status = 200, description = "Katakana rendering, or a renderable failure message", body = KatakanaResponse),
        (status = 400, description = "No text provided", body = ErrorResponse)
    )
)]
async fn katakana(State(state): State<Arc<AppState>>, Json(payload): Json<KatakanaRequest>) -> Response {
    if payload.text.trim().is_empty() {
        return missing_text();
    }

    let source = match requested_language(payload.source_language.as_deref()) {
        Some(source) => source,
        None => state.pipeline.detector().detect(&payload.text).await,
    };

    let result = state
        .pipeline
        .transliterator()
        .transliterate(&payload.text, &source)
        .await;

    Json(KatakanaResponse {
        katakana: result.primary,
        pronunciation: result.pronunciation_hint,
        succeeded: result.succeeded,
    })
    .into_response()
}

/// Build the router with permissive CORS
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_check))
        .route("/api/openapi.json", get(openapi))
        .route("/api/detect", post(detect).fallback(method_not_allowed))
        .route("/api/translate", post(translate).fallback(method_not_allowed))
        .route("/api/katakana", post(katakana).fallback(method_not_allowed))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Create pipeline
    let pipeline = Arc::new(Pipeline::from_config(config)?);

    // Create app state
    let state = Arc::new(AppState::new(pipeline));
    let app = router(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
