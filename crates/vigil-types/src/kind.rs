use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// The two kinds of capture a source can upload.
///
/// Both kinds share one ingestion contract and one worker loop; the kind only
/// selects the endpoint, the JSON payload field and the stored discriminator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    #[strum(serialize = "screenshot")]
    Screenshot,
    #[strum(serialize = "frame")]
    Frame,
}

impl CaptureKind {
    pub const ALL: [CaptureKind; 2] = [CaptureKind::Screenshot, CaptureKind::Frame];

    /// Path of the ingestion endpoint, relative to the server base URL.
    pub fn upload_path(self) -> &'static str {
        match self {
            CaptureKind::Screenshot => "/api/upload_screenshot",
            CaptureKind::Frame => "/api/upload_frame",
        }
    }

    /// Name of the JSON field holding the base64 image.
    pub fn payload_field(self) -> &'static str {
        match self {
            CaptureKind::Screenshot => "image",
            CaptureKind::Frame => "frame",
        }
    }

    /// MIME type of the encoded image the agent sends for this kind.
    pub fn mime_type(self) -> &'static str {
        match self {
            CaptureKind::Screenshot => "image/png",
            CaptureKind::Frame => "image/jpeg",
        }
    }

    /// Discriminator stored alongside each record.
    pub fn as_str(self) -> &'static str {
        match self {
            CaptureKind::Screenshot => "screenshot",
            CaptureKind::Frame => "frame",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn discriminator_parses_back() {
        for kind in CaptureKind::ALL {
            assert_eq!(CaptureKind::from_str(kind.as_str()).unwrap(), kind);
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert!(CaptureKind::from_str("video_frame").is_err());
    }

    #[test]
    fn endpoints_are_distinct() {
        assert_ne!(
            CaptureKind::Screenshot.upload_path(),
            CaptureKind::Frame.upload_path()
        );
        assert_eq!(CaptureKind::Frame.payload_field(), "frame");
    }
}
