//! Full-screen capture of the primary monitor using the `xcap` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use tracing::debug;
use tokio_util::sync::CancellationToken;
use xcap::Monitor;

use super::Capturer;
use crate::error::CaptureError;

/// Captures the primary monitor (or the first one, if none reports as
/// primary) and encodes it as PNG.
#[derive(Debug, Default, Clone)]
pub struct ScreenCapturer;

impl ScreenCapturer {
    pub fn new() -> Self {
        Self
    }
}

impl Capturer for ScreenCapturer {
    fn capture(&self, _cancel: &CancellationToken) -> Result<Vec<u8>, CaptureError> {
        let monitors = Monitor::all()
            .map_err(|e| CaptureError::Unavailable(format!("failed to enumerate monitors: {e}")))?;

        let mut monitors = monitors.into_iter();
        let first = monitors
            .next()
            .ok_or_else(|| CaptureError::Unavailable("no monitor found".to_owned()))?;
        let primary = if first.is_primary().unwrap_or(false) {
            first
        } else {
            monitors
                .find(|m| m.is_primary().unwrap_or(false))
                .unwrap_or(first)
        };

        let frame = primary
            .capture_image()
            .map_err(|e| CaptureError::Failed(e.to_string()))?;
        let (width, height) = frame.dimensions();

        let mut png = Vec::new();
        DynamicImage::ImageRgba8(frame).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        debug!(width, height, bytes = png.len(), "screen captured");
        Ok(png)
    }
}
