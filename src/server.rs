use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{info, warn};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::provider::TranscriptProvider;
use crate::{TranscriptError, TranscriptResult, extract_video_id, parse_languages, resolver};

pub const SERVICE_NAME: &str = "Transcript Service v2";

/// Shared per-process state; immutable after startup
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn TranscriptProvider>,
    pub default_languages: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(provider: Arc<dyn TranscriptProvider>, default_languages: Vec<String>) -> Self {
        Self {
            provider,
            default_languages: Arc::new(default_languages),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    pub url: Option<String>,
    pub languages: Option<String>,
}

impl TranscriptError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranscriptError::InvalidUrl => StatusCode::BAD_REQUEST,
            TranscriptError::NotFound { .. } => StatusCode::NOT_FOUND,
            TranscriptError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TranscriptError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/transcript", get(get_transcript))
        .layer(cors)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true, "service": SERVICE_NAME }))
}

async fn get_transcript(
    State(state): State<AppState>,
    Query(query): Query<TranscriptQuery>,
) -> Result<Json<TranscriptResult>, TranscriptError> {
    let url = query.url.unwrap_or_default();
    let video_id = extract_video_id(&url).ok_or_else(|| {
        info!("Rejected transcript request: no video ID in {url:?}");
        TranscriptError::InvalidUrl
    })?;

    let mut languages = query.languages.as_deref().map(parse_languages).unwrap_or_default();
    if languages.is_empty() {
        languages = state.default_languages.as_ref().clone();
    }

    match resolver::resolve(state.provider.as_ref(), &video_id, &languages).await {
        Ok(result) => {
            info!(
                "Transcript for {video_id}: lang={} chars={}",
                result.language.as_deref().unwrap_or("unknown"),
                result.transcript.len()
            );
            Ok(Json(result))
        }
        Err(e) => {
            warn!("Transcript for {video_id} failed ({}): {e}", e.status_code());
            Err(e)
        }
    }
}
