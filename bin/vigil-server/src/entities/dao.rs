use chrono::{DateTime, Utc};
use uuid::Uuid;
use vigil_types::CaptureKind;

/// A row in the `capture_records` table. Rows are never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    pub id: Uuid,
    pub kind: CaptureKind,
    pub employee_id: String,
    /// Decoded image bytes (PNG for screenshots, JPEG for frames).
    pub image: Vec<u8>,
    pub captured_at: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
}
