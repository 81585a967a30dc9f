use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Hint returned alongside a failed discovery
pub const NOT_FOUND_HINT: &str = "Scanned the public API href (if available) and the provided page, \
     its external scripts and inline scripts for a .../hls/.../master-playlist.m3u8 link. \
     Provide the embed or share page URL that contains the playlist.";

/// Main error type for the proxy
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Missing ?url= parameter")]
    MissingUrl,

    #[error("HLS master playlist not found")]
    PlaylistNotFound { tested: Vec<String> },

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tested: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            hint: None,
            tested: None,
            details: None,
        }
    }

    fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ProxyError::MissingUrl => (StatusCode::BAD_REQUEST, ErrorBody::new(self.to_string())),
            ProxyError::PlaylistNotFound { tested } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "HLS master playlist not found".to_string(),
                    hint: Some(NOT_FOUND_HINT),
                    tested: Some(tested),
                    details: None,
                },
            ),
            ProxyError::Upstream(_) | ProxyError::UpstreamStatus { .. } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody::new("Upstream request failed").with_details(self.to_string()),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Server error").with_details(self.to_string()),
            ),
        };

        let mut response = (status, Json(body)).into_response();
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        response
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ProxyError>;
