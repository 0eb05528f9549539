//! Single-frame webcam capture through the `ffmpeg` binary.
//!
//! ffmpeg opens the camera with the platform's capture input, grabs one frame
//! and writes it to stdout as MJPEG, which `ffmpeg-sidecar` hands back as
//! output chunks. A camera read can hang, so the events are drained on a
//! helper thread while the caller watches the stop token and kills ffmpeg
//! when it fires.

use std::thread;
use std::time::Duration;

use ffmpeg_sidecar::command::{ffmpeg_is_installed, FfmpegCommand};
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Capturer;
use crate::error::CaptureError;

const CANCEL_POLL: Duration = Duration::from_millis(50);

#[cfg(target_os = "linux")]
const INPUT_FORMAT: &str = "v4l2";
#[cfg(target_os = "macos")]
const INPUT_FORMAT: &str = "avfoundation";
#[cfg(target_os = "windows")]
const INPUT_FORMAT: &str = "dshow";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const INPUT_FORMAT: &str = "v4l2";

/// Device used when the config does not name one. DirectShow has no
/// positional default, so Windows always needs `webcam_device`.
fn default_device() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("0")
    } else if cfg!(target_os = "windows") {
        None
    } else {
        Some("/dev/video0")
    }
}

#[derive(Debug, Clone)]
pub struct WebcamCapturer {
    device: Option<String>,
}

impl WebcamCapturer {
    pub fn new(device: Option<String>) -> Self {
        Self { device }
    }

    fn device(&self) -> Option<&str> {
        self.device.as_deref().or_else(default_device)
    }
}

impl Capturer for WebcamCapturer {
    fn capture(&self, cancel: &CancellationToken) -> Result<Vec<u8>, CaptureError> {
        let device = self.device().ok_or_else(|| {
            CaptureError::Unavailable("no default camera on this platform; set webcam_device".to_owned())
        })?;
        if !ffmpeg_is_installed() {
            return Err(CaptureError::Unavailable("ffmpeg binary not found on PATH".to_owned()));
        }

        let mut command = FfmpegCommand::new();
        let mut child = command
            .hide_banner()
            .args(["-f", INPUT_FORMAT])
            .input(device)
            .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "mjpeg"])
            .output("-")
            .spawn()
            .map_err(|e| CaptureError::Unavailable(format!("failed to start ffmpeg: {e}")))?;

        let events = child
            .iter()
            .map_err(|e| CaptureError::Failed(format!("failed to read ffmpeg output: {e}")))?;
        let log_device = device.to_owned();
        let reader = thread::spawn(move || {
            let mut jpeg = Vec::new();
            let mut last_error = None;
            for event in events {
                match event {
                    FfmpegEvent::OutputChunk(chunk) => jpeg.extend_from_slice(&chunk),
                    FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) | FfmpegEvent::Error(msg) => {
                        debug!(device = %log_device, "[FFmpeg] {}", msg);
                        last_error = Some(msg);
                    }
                    _ => {}
                }
            }
            (jpeg, last_error)
        });

        let mut killed = false;
        while !reader.is_finished() {
            if !killed && cancel.is_cancelled() {
                if let Err(e) = child.kill() {
                    debug!(error = %e, "failed to kill ffmpeg");
                }
                killed = true;
            }
            thread::sleep(CANCEL_POLL);
        }
        let (jpeg, last_error) = reader
            .join()
            .map_err(|_| CaptureError::Failed("ffmpeg output reader panicked".to_owned()))?;
        if let Err(e) = child.wait() {
            debug!(error = %e, "ffmpeg did not exit cleanly");
        }

        if killed {
            return Err(CaptureError::Cancelled);
        }
        if jpeg.is_empty() {
            let reason = last_error.unwrap_or_else(|| "ffmpeg produced no frame".to_owned());
            return Err(CaptureError::Unavailable(format!("cannot read from camera {device}: {reason}")));
        }
        debug!(device, bytes = jpeg.len(), "webcam frame captured");
        Ok(jpeg)
    }
}
