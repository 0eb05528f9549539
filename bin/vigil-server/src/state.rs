//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use axum_extra::extract::cookie::Key;

use crate::auth::CredentialStore;
use crate::config::Config;
use crate::entities::SqliteStore;
use crate::views::Views;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Append-only capture record store.
    pub store: Arc<SqliteStore>,
    /// Operator password hashes.
    pub credentials: Arc<dyn CredentialStore>,
    /// Session cookie signing key.
    pub cookie_key: Key,
    /// Compiled dashboard templates.
    pub views: Arc<Views>,
}
