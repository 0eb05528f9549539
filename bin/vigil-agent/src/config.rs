//! Agent configuration, read from a TOML file.

use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use vigil_types::CaptureKind;

use crate::error::ConfigError;
use crate::worker::WorkerSpec;

/// Values that mean "the operator never set an identity".
pub const PLACEHOLDER_SOURCE_IDS: [&str; 2] = ["default_employee", "unknown_employee"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Identity of the monitored source; must be changed from the placeholder.
    pub employee_id: String,
    /// Base URL of vigil-server, e.g. `http://localhost:5000`.
    pub server_url: String,
    pub screenshot_interval_seconds: u64,
    pub webcam_frame_interval_seconds: u64,
    pub webcam_enabled: bool,
    /// Camera passed to ffmpeg; platform default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webcam_device: Option<String>,
    pub request_timeout_seconds: u64,
    pub shutdown_timeout_seconds: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            employee_id: PLACEHOLDER_SOURCE_IDS[0].to_owned(),
            server_url: "http://localhost:5000".to_owned(),
            screenshot_interval_seconds: 60,
            webcam_frame_interval_seconds: 30,
            webcam_enabled: true,
            webcam_device: None,
            request_timeout_seconds: 10,
            shutdown_timeout_seconds: 5,
        }
    }
}

impl AgentConfig {
    /// Read and validate the config at `path`.
    ///
    /// A missing file is replaced by the defaults and reported as an error,
    /// since the default identity is a placeholder anyway.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };
        if !path.exists() {
            let text = toml::to_string_pretty(&AgentConfig::default())?;
            std::fs::write(path, text).map_err(io_err)?;
            return Err(ConfigError::DefaultCreated(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(io_err)?;
        let cfg: AgentConfig = toml::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let id = self.employee_id.trim();
        if id.is_empty() || PLACEHOLDER_SOURCE_IDS.contains(&id) {
            return Err(ConfigError::UnsetSourceId(self.employee_id.clone()));
        }
        if self.screenshot_interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval("screenshot_interval_seconds"));
        }
        if self.webcam_frame_interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval("webcam_frame_interval_seconds"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::ZeroInterval("request_timeout_seconds"));
        }
        match Url::parse(&self.server_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
            _ => Err(ConfigError::InvalidServerUrl(self.server_url.clone())),
        }
    }

    pub fn worker_spec(&self, kind: CaptureKind) -> WorkerSpec {
        let (interval, enabled) = match kind {
            CaptureKind::Screenshot => (self.screenshot_interval_seconds, true),
            CaptureKind::Frame => (self.webcam_frame_interval_seconds, self.webcam_enabled),
        };
        WorkerSpec {
            kind,
            employee_id: self.employee_id.trim().to_owned(),
            interval: Duration::from_secs(interval),
            enabled,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn valid() -> AgentConfig {
        AgentConfig {
            employee_id: "e1".into(),
            ..AgentConfig::default()
        }
    }

    #[test]
    fn placeholder_identities_are_refused() {
        for id in ["", "   ", "default_employee", "unknown_employee"] {
            let cfg = AgentConfig { employee_id: id.into(), ..valid() };
            assert!(matches!(cfg.validate(), Err(ConfigError::UnsetSourceId(_))), "{id:?}");
        }
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn zero_interval_is_refused() {
        let cfg = AgentConfig { webcam_frame_interval_seconds: 0, ..valid() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ZeroInterval("webcam_frame_interval_seconds"))
        ));
    }

    #[test]
    fn server_url_must_be_http() {
        for url in ["localhost:5000", "ftp://host", "not a url"] {
            let cfg = AgentConfig { server_url: url.into(), ..valid() };
            assert!(matches!(cfg.validate(), Err(ConfigError::InvalidServerUrl(_))), "{url}");
        }
    }

    #[test]
    fn partial_file_takes_defaults() {
        let cfg: AgentConfig = toml::from_str(
            r#"
            employee_id = "alice"
            webcam_enabled = false
            "#,
        )
        .unwrap();
        assert!(cfg.validate().is_ok());
        let frame = cfg.worker_spec(CaptureKind::Frame);
        assert!(!frame.enabled);
        assert_eq!(frame.interval, Duration::from_secs(30));
        assert_eq!(cfg.worker_spec(CaptureKind::Screenshot).interval, Duration::from_secs(60));
    }

    #[test]
    fn missing_file_is_created_with_placeholder() {
        let path = std::env::temp_dir().join(format!("vigil-agent-test-{}.toml", std::process::id()));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(AgentConfig::load(&path), Err(ConfigError::DefaultCreated(_))));
        // The written defaults still carry the placeholder identity.
        assert!(matches!(AgentConfig::load(&path), Err(ConfigError::UnsetSourceId(_))));
        std::fs::remove_file(&path).unwrap();
    }
}
