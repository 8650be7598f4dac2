use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::news::NewsError;

/// Failure reported by one of the external providers.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    News(#[from] NewsError),

    #[error(transparent)]
    Completion(#[from] LlmError),
}

/// A completion succeeded but its output did not pass validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Failed to generate title: empty response")]
    EmptyTitle,

    #[error("Failed to generate meta description: empty response")]
    EmptyMetaDescription,

    #[error("Generated content is too short or empty")]
    ContentTooShort { chars: usize, min_chars: usize },
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", .0.body_text())]
    InvalidPayload(#[from] JsonRejection),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Unexpected error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<NewsError> for AppError {
    fn from(e: NewsError) -> Self {
        AppError::Upstream(UpstreamError::News(e))
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            // A 2xx without choices is not a provider fault we can describe
            LlmError::NoChoices => AppError::Internal(anyhow::Error::new(e)),
            other => AppError::Upstream(UpstreamError::Completion(other)),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(rejection) => rejection.status(),
            AppError::Upstream(_) | AppError::Generation(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        match &self {
            AppError::InvalidPayload(_) => tracing::warn!("Rejected request body: {detail}"),
            AppError::Upstream(_) => tracing::error!("Upstream error: {detail}"),
            AppError::Generation(GenerationError::ContentTooShort { chars, min_chars }) => {
                tracing::error!("Generated content too short: {chars} characters (min {min_chars})")
            }
            AppError::Generation(_) => tracing::error!("Generation error: {detail}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
