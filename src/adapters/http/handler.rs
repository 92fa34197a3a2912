use crate::core::exam::ExamService;
use crate::core::{ExamResult, FieldErrors, GenerationClient};
use crate::domain::model::ValidationFailure;
use crate::utils::error::ExamError;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

pub struct AppState<G: GenerationClient> {
    pub service: Arc<ExamService<G>>,
}

impl<G: GenerationClient> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl IntoResponse for ExamError {
    fn into_response(self) -> Response {
        match self {
            ExamError::InvalidInput(errors) => {
                tracing::warn!("Rejected exam request: {}", errors);
                (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationFailure { error: errors }),
                )
                    .into_response()
            }
            other => {
                tracing::error!("Exam generation failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ExamResult::failure()),
                )
                    .into_response()
            }
        }
    }
}

/// Only `application/json` bodies are parsed; anything else reaches
/// validation as an object without fields.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// An empty body reads as an object without fields.
pub fn parse_body(body: &[u8]) -> Result<Value, ExamError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Malformed JSON body: {}", e);
        let mut errors = FieldErrors::default();
        errors.add_form("Malformed JSON body");
        ExamError::InvalidInput(errors)
    })
}

pub async fn generate_exam<G: GenerationClient + 'static>(
    State(state): State<AppState<G>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: &[u8] = if is_json_content_type(&headers) {
        &body
    } else {
        tracing::debug!("Ignoring body without a JSON content type");
        &[]
    };

    let payload = match parse_body(body) {
        Ok(payload) => payload,
        Err(e) => return e.into_response(),
    };

    match state.service.generate_exam(&payload).await {
        Ok(exam) => {
            tracing::info!("Generated exam ({} chars)", exam.len());
            (StatusCode::OK, Json(ExamResult::success(exam))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
