//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - per-request trace-ID middleware
//! - health route
//! - unauthenticated ingestion routes under `/api`
//! - `/login`, plus session-protected `/`, `/dashboard` and `/logout`

mod dashboard;
mod health;
mod session;
mod upload;

use std::sync::Arc;

use axum::{middleware, Router};

use crate::middleware::{auth, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(dashboard::router())
        .merge(session::protected_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .merge(health::router())
        .merge(upload::router(state.config.max_upload_bytes))
        .merge(session::public_router())
        .merge(protected)
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
