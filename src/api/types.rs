use axum::{Json, http::StatusCode};
use serde::Deserialize;

use crate::models::ErrorBody;
use crate::tmdb::UpstreamError;

#[derive(Debug, Deserialize)]
pub struct MovieSearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

impl MovieSearchParams {
    /// An empty query means "browse popular" rather than "search for nothing".
    pub fn search_term(&self) -> Option<&str> {
        self.query.as_deref().filter(|query| !query.is_empty())
    }

    /// First whitespace-delimited token, used by the recommendation fallback.
    pub fn first_token(&self) -> Option<&str> {
        self.query.as_deref()?.split_whitespace().next()
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<anyhow::Error>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            detail: None,
        }
    }

    /// Any upstream failure surfaces as a 500 with a fixed, operation-specific message.
    pub fn upstream(message: impl Into<String>, err: UpstreamError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            detail: Some(err.into()),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let Some(detail) = &self.detail {
            tracing::error!(error = %detail, message = %self.message);
        }
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
