use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use vigil_types::format_display;

use crate::entities::CaptureRecord;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub employee_id: Option<String>,
}

/// One tile in the activity feed.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    /// Record id as opaque text.
    pub id: String,
    pub kind: &'static str,
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub timestamp: String,
    /// Inline `data:` URI for the image.
    pub image_src: String,
}

impl CaptureRecord {
    pub fn to_entry(&self) -> ActivityEntry {
        ActivityEntry {
            id: self.id.to_string(),
            kind: self.kind.as_str(),
            timestamp: format_display(&self.captured_at),
            image_src: format!("data:{};base64,{}", self.kind.mime_type(), STANDARD.encode(&self.image)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub logged_out: bool,
}
