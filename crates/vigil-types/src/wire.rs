//! JSON bodies exchanged on the ingestion endpoints.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::kind::CaptureKind;

/// Message returned for any upload lacking a required field.
pub const MISSING_DATA: &str = "Missing data";

/// Upload body as received by the server.
///
/// Every field is optional so that a missing field surfaces as a validation
/// error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadRequest {
    pub employee_id: Option<String>,
    pub image: Option<String>,
    pub frame: Option<String>,
    pub timestamp: Option<String>,
}

impl UploadRequest {
    /// The base64 payload for `kind`, ignoring the other kind's field.
    pub fn payload(&self, kind: CaptureKind) -> Option<&str> {
        match kind {
            CaptureKind::Screenshot => self.image.as_deref(),
            CaptureKind::Frame => self.frame.as_deref(),
        }
    }
}

/// Upload body as sent by the agent.
#[derive(Debug, Clone)]
pub struct UploadBody {
    pub kind: CaptureKind,
    pub employee_id: String,
    /// Base64 (standard alphabet, padded) encoded image.
    pub payload: String,
    pub timestamp: String,
}

impl Serialize for UploadBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("employee_id", &self.employee_id)?;
        map.serialize_entry(self.kind.payload_field(), &self.payload)?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// `{"status": "...", "message": "..."}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub status: Status,
    pub message: String,
}

impl ApiStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self { status: Status::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: Status::Error, message: message.into() }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_uses_kind_specific_field() {
        let body = UploadBody {
            kind: CaptureKind::Frame,
            employee_id: "e1".into(),
            payload: "AAAA".into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"employee_id": "e1", "frame": "AAAA", "timestamp": "2024-01-01T00:00:00Z"})
        );
    }

    #[test]
    fn request_ignores_other_kinds_field() {
        let req: UploadRequest = serde_json::from_value(json!({
            "employee_id": "e1",
            "frame": "AAAA",
            "timestamp": "2024-01-01T00:00:00"
        }))
        .unwrap();
        assert_eq!(req.payload(CaptureKind::Frame), Some("AAAA"));
        assert_eq!(req.payload(CaptureKind::Screenshot), None);
    }

    #[test]
    fn status_body_shape() {
        assert_eq!(
            serde_json::to_value(ApiStatus::error(MISSING_DATA)).unwrap(),
            json!({"status": "error", "message": "Missing data"})
        );
    }
}
