//! Liveness check for process supervisors and agents checking the server URL.
//!
//! Sits outside the session layer and never touches the capture store, so it
//! answers even while the database is unavailable.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// `{"status": "ok", "version": "<vigil-server version>"}`.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn reports_server_version() {
        let Json(body) = health().await;
        assert_eq!(body, json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}));
    }
}
