//! Types shared between `vigil-agent` and `vigil-server`.
//!
//! Everything that crosses the wire lives here so that both sides agree on
//! endpoint paths, JSON field names and the accepted timestamp forms.

pub mod kind;
pub mod time;
pub mod wire;

pub use kind::CaptureKind;
pub use time::{format_display, format_wire, parse_timestamp, TimestampError};
pub use wire::{ApiStatus, Status, UploadBody, UploadRequest, MISSING_DATA};
