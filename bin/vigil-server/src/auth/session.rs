//! Signed session cookie carrying the operator's username.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};
use tracing::warn;
use uuid::Uuid;

use super::CredentialStore;

pub const SESSION_COOKIE: &str = "vigil_session";

/// Username of the signed-in operator, inserted into request extensions by
/// the session middleware.
#[derive(Debug, Clone)]
pub struct SessionUser(pub String);

/// Cookie signing key derived from the configured secret.
///
/// Without a secret a random key is used, so sessions end when the process exits.
pub fn signing_key(secret: Option<&str>) -> Key {
    let material = match secret {
        Some(secret) => secret.to_owned(),
        None => format!("{}{}", Uuid::new_v4(), Uuid::new_v4()),
    };
    Key::from(Sha512::digest(material.as_bytes()).as_slice())
}

/// The signed-in user for this request, if the cookie is valid and the
/// credential store still knows the user.
pub async fn current_user(
    headers: &HeaderMap,
    key: &Key,
    credentials: &dyn CredentialStore,
) -> Option<String> {
    let jar = SignedCookieJar::from_headers(headers, key.clone());
    let username = jar.get(SESSION_COOKIE)?.value().to_owned();
    match credentials.password_hash(&username).await {
        Ok(Some(_)) => Some(username),
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "credential lookup failed while checking session");
            None
        }
    }
}

pub fn start_session(jar: SignedCookieJar, username: String) -> SignedCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, username))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

pub fn end_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
