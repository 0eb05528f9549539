//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for vigil-server.
///
/// Every field has a default so the server starts without any environment
/// variables set; without `VIGIL_ADMIN_PASSWORD_HASH`, however, nobody can
/// sign in to the dashboard.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://vigil.db"`).
    pub database_url: String,

    /// Secret the session-cookie signing key is derived from.
    pub secret_key: Option<String>,

    /// Username of the dashboard operator (default: `"admin"`).
    pub admin_username: String,

    /// bcrypt hash of the operator password.
    pub admin_password_hash: Option<String>,

    /// Largest accepted upload body in bytes (default: 32 MiB).
    pub max_upload_bytes: usize,

    /// `tracing` filter string, e.g. `"info"` or `"debug,sqlx=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("VIGIL_BIND", "0.0.0.0:5000"),
            database_url: env_or("VIGIL_DATABASE_URL", "sqlite://vigil.db"),
            secret_key: env_opt("VIGIL_SECRET_KEY"),
            admin_username: env_or("VIGIL_ADMIN_USERNAME", "admin"),
            admin_password_hash: env_opt("VIGIL_ADMIN_PASSWORD_HASH"),
            max_upload_bytes: parse_env("VIGIL_MAX_UPLOAD_BYTES", 32 * 1024 * 1024),
            log_level: env_or("VIGIL_LOG", "info"),
            log_json: std::env::var("VIGIL_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_owned(),
            database_url: "sqlite://vigil.db".to_owned(),
            secret_key: None,
            admin_username: "admin".to_owned(),
            admin_password_hash: None,
            max_upload_bytes: 32 * 1024 * 1024,
            log_level: "info".to_owned(),
            log_json: false,
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
