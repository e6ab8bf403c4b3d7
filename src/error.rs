use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Cap on how much of an upstream error body is echoed into a client-facing
/// message. Full bodies go to the server log.
const UPSTREAM_BODY_CAP: usize = 2048;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("image is required")]
    MissingImage,

    #[error("invalid image payload: {0}")]
    InvalidDataUrl(String),

    #[error("not an image: {0}")]
    NotAnImage(String),

    #[error("failed to decode image: {0}")]
    UnreadableImage(String),

    #[error("no text detected in image")]
    NoTextDetected,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{provider} error ({status}): {body}")]
    Upstream {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// Build an upstream failure that mirrors the provider's status code.
    /// The echoed body is truncated to [`UPSTREAM_BODY_CAP`] bytes.
    pub fn upstream(provider: &'static str, status: u16, body: String) -> Self {
        let body = if body.len() > UPSTREAM_BODY_CAP {
            let mut end = UPSTREAM_BODY_CAP;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &body[..end])
        } else {
            body
        };
        ExtractError::Upstream {
            provider,
            status,
            body,
        }
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        ExtractError::Internal(err.to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    pub code: String,
}

impl IntoResponse for ExtractError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ExtractError::NotConfigured(_) => (StatusCode::INTERNAL_SERVER_ERROR, "NOT_CONFIGURED"),
            ExtractError::MissingImage => (StatusCode::BAD_REQUEST, "MISSING_IMAGE"),
            ExtractError::InvalidDataUrl(_) => (StatusCode::BAD_REQUEST, "INVALID_IMAGE"),
            ExtractError::NotAnImage(_) => (StatusCode::BAD_REQUEST, "NOT_AN_IMAGE"),
            ExtractError::UnreadableImage(_) => (StatusCode::BAD_REQUEST, "UNREADABLE_IMAGE"),
            ExtractError::NoTextDetected => (StatusCode::BAD_REQUEST, "NO_TEXT_DETECTED"),
            ExtractError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ExtractError::Upstream { status, .. } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "UPSTREAM_ERROR",
            ),
            ExtractError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            ok: false,
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
