//! Login and logout.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use axum_extra::extract::cookie::SignedCookieJar;
use minijinja::context;
use tracing::{info, warn};

use crate::auth::session::{current_user, end_session, start_session};
use crate::auth::{verify_login, INVALID_CREDENTIALS};
use crate::error::ServerError;
use crate::schemas::dashboard::{LoginForm, LoginQuery};
use crate::state::AppState;

const LOGGED_OUT: &str = "You have been logged out.";

/// `/login`, reachable without a session.
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", get(login_page).post(login_submit))
}

/// `/logout`, behind the session middleware.
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/logout", get(logout))
}

pub async fn login_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<LoginQuery>,
) -> Result<Response, ServerError> {
    if current_user(&headers, &state.cookie_key, state.credentials.as_ref()).await.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    let notice = query.logged_out.then_some(LOGGED_OUT);
    let html = state.views.render("login.html", context! { notice })?;
    Ok(Html(html).into_response())
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, ServerError> {
    if verify_login(state.credentials.as_ref(), &form.username, &form.password).await? {
        info!(username = %form.username, "operator signed in");
        let jar = SignedCookieJar::from_headers(&headers, state.cookie_key.clone());
        let jar = start_session(jar, form.username);
        return Ok((jar, Redirect::to("/dashboard")).into_response());
    }

    warn!(username = %form.username, "failed sign-in attempt");
    let html = state.views.render(
        "login.html",
        context! { error => INVALID_CREDENTIALS, username => form.username },
    )?;
    Ok((StatusCode::UNAUTHORIZED, Html(html)).into_response())
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let jar = end_session(SignedCookieJar::from_headers(&headers, state.cookie_key.clone()));
    (jar, Redirect::to("/login?logged_out=true"))
}
