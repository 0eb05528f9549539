//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a
//! `{"status": "error", "message": ...}` body with a matching status code.
//!
//! Database and internal errors are logged with full detail but answered with
//! a generic message so that SQL and file paths never reach the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;
use vigil_types::ApiStatus;

/// All errors that can occur in the vigil-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the SQLite store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The caller sent an invalid or incomplete request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A dashboard page failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let client_message = match &self {
            ServerError::BadRequest(m) => m.clone(),
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                "failed to store or read capture records".to_owned()
            }
            ServerError::Template(e) => {
                error!(error = ?e, "template rendering failed");
                "internal server error".to_owned()
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                "internal server error".to_owned()
            }
        };
        (self.status(), Json(ApiStatus::error(client_message))).into_response()
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(e: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("blocking task failed: {e}"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn bad_request_exposes_message() {
        let resp = ServerError::BadRequest("Missing data".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: ApiStatus = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, ApiStatus::error("Missing data"));
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let resp = ServerError::Internal("/var/lib/vigil.db locked".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("/var/lib"));
        assert!(text.contains("\"status\":\"error\""));
    }
}
