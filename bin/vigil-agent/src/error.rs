//! Error types of the capture agent.
//!
//! Only [`ConfigError`] is fatal. Capture and delivery errors are logged by
//! the worker and end the current cycle.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write default config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config file {0} did not exist; a default one was written, edit it and restart")]
    DefaultCreated(PathBuf),

    #[error("employee_id is not set (got {0:?}); set it in the config file")]
    UnsetSourceId(String),

    #[error("{0} must be at least 1 second")]
    ZeroInterval(&'static str),

    #[error("server_url {0:?} is not an absolute http(s) URL")]
    InvalidServerUrl(String),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    /// The device or tool needed for this capture is not there.
    #[error("capture unavailable: {0}")]
    Unavailable(String),

    /// The device was there but this capture failed.
    #[error("capture failed: {0}")]
    Failed(String),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// Stop was requested while the capture was running.
    #[error("capture cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network error, timeout, or a client that could not be built.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
}
