use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use crate::auth::session::{current_user, SessionUser};
use crate::state::AppState;

/// Let the request through only with a valid operator session; everyone else
/// is sent to the login page.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match current_user(req.headers(), &state.cookie_key, state.credentials.as_ref()).await {
        Some(username) => {
            req.extensions_mut().insert(SessionUser(username));
            next.run(req).await
        }
        None => {
            debug!(path = %req.uri().path(), "no valid session; redirecting to login");
            Redirect::to("/login").into_response()
        }
    }
}
