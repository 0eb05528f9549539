//! Capture capabilities.
//!
//! A [`Capturer`] grabs one still image and returns it encoded. Calls block
//! (device I/O, encoding), so workers run them on the blocking pool and pass
//! the stop token along for captures that can be interrupted.

mod screen;
mod webcam;

pub use screen::ScreenCapturer;
pub use webcam::WebcamCapturer;

use tokio_util::sync::CancellationToken;

use crate::error::CaptureError;

pub trait Capturer: Send + Sync + 'static {
    /// Capture one image, encoded in the format the server expects for its kind.
    ///
    /// Long-running captures should give up with [`CaptureError::Cancelled`]
    /// once `cancel` fires.
    fn capture(&self, cancel: &CancellationToken) -> Result<Vec<u8>, CaptureError>;
}
