//! Error types for agt-web
//!
//! Browser-facing routes answer errors with a small HTML page; the status
//! code carries the meaning (404 for missing records, 500 otherwise).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::views;

#[derive(Debug, Error)]
pub enum WebError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// agt-common error
    #[error(transparent)]
    Common(#[from] agt_common::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WebError::NotFound(msg) | WebError::Common(agt_common::Error::NotFound(msg)) => {
                warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg)
            }
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            WebError::Common(err) => {
                error!("Request failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, views::error_page(status, &message)).into_response()
    }
}

/// Result type for handlers
pub type WebResult<T> = Result<T, WebError>;

/// Route ids are numeric; anything else is simply a page that doesn't exist
pub fn parse_id(raw: &str) -> WebResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| WebError::NotFound(format!("No record with id '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(WebError::NotFound(_))));
        assert!(matches!(parse_id(""), Err(WebError::NotFound(_))));
    }

    #[test]
    fn test_status_mapping() {
        let not_found = WebError::NotFound("x".into()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let common_missing = WebError::from(agt_common::Error::NotFound("x".into())).into_response();
        assert_eq!(common_missing.status(), StatusCode::NOT_FOUND);

        let conflict = WebError::from(agt_common::Error::Concurrency("x".into())).into_response();
        assert_eq!(conflict.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bad = WebError::BadRequest("x".into()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }
}
