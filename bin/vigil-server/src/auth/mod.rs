//! Operator authentication for the dashboard.
//!
//! Route logic only talks to [`CredentialStore`] ("look up the password hash
//! for a username"), so the single configured operator can later be replaced
//! by a real user table without touching the handlers.

pub mod session;

use std::sync::OnceLock;

use async_trait::async_trait;
use tracing::warn;

use crate::error::ServerError;

/// Shown for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// bcrypt hash stored for `username`, if the user exists.
    async fn password_hash(&self, username: &str) -> Result<Option<String>, ServerError>;
}

/// The single operator account taken from the server configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredCredentials {
    username: String,
    password_hash: Option<String>,
}

impl ConfiguredCredentials {
    pub fn new(username: impl Into<String>, password_hash: Option<String>) -> Self {
        Self {
            username: username.into(),
            password_hash,
        }
    }
}

#[async_trait]
impl CredentialStore for ConfiguredCredentials {
    async fn password_hash(&self, username: &str) -> Result<Option<String>, ServerError> {
        if username == self.username {
            Ok(self.password_hash.clone())
        } else {
            Ok(None)
        }
    }
}

/// Hash checked when there is no stored hash, so unknown users cost one
/// bcrypt verification like known ones.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| bcrypt::hash("vigil-unknown-operator", bcrypt::DEFAULT_COST).ok())
        .as_deref()
}

/// Check `password` against the stored hash for `username`.
///
/// Unknown users, wrong passwords and malformed stored hashes all yield
/// `Ok(false)`; only store failures are errors.
pub async fn verify_login(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<bool, ServerError> {
    let stored = store.password_hash(username).await?;
    let password = password.to_owned();
    // bcrypt is slow; keep it off the async workers.
    let verdict = tokio::task::spawn_blocking(move || match stored {
        Some(hash) => bcrypt::verify(password, &hash),
        None => {
            if let Some(dummy) = dummy_hash() {
                let _ = bcrypt::verify(password, dummy);
            }
            Ok(false)
        }
    })
    .await?;
    match verdict {
        Ok(matches) => Ok(matches),
        Err(e) => {
            warn!(username = %username, error = %e, "stored password hash is not a valid bcrypt hash");
            Ok(false)
        }
    }
}
