//! The periodic capture-and-upload loop, shared by both capture kinds.
//!
//! Per cycle: capture (on the blocking pool) → deliver once → wait for the
//! interval. Failures end the cycle and are only logged; nothing is retried
//! or buffered. The wait races the stop signal, so a stopped worker exits
//! promptly however long its interval is.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use vigil_types::{format_wire, CaptureKind, UploadBody};

use crate::capture::Capturer;
use crate::delivery::Uploader;
use crate::error::CaptureError;

#[derive(Debug, Clone)]
pub struct WorkerSpec {
    pub kind: CaptureKind,
    pub employee_id: String,
    pub interval: Duration,
    /// A disabled worker returns at once without touching its capturer.
    pub enabled: bool,
}

/// Per-worker cycle counters, reported when the worker stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub captured: u64,
    pub delivered: u64,
    pub capture_failed: u64,
    pub delivery_failed: u64,
}

pub async fn run_worker<C: Capturer, U: Uploader>(
    spec: WorkerSpec,
    capturer: Arc<C>,
    uploader: Arc<U>,
    cancel: CancellationToken,
) -> WorkerStats {
    let kind = spec.kind;
    let mut stats = WorkerStats::default();
    if !spec.enabled {
        info!(%kind, "capture disabled");
        return stats;
    }
    info!(%kind, interval_secs = spec.interval.as_secs(), "worker started");

    while !cancel.is_cancelled() {
        let captured_at = Utc::now();
        let cap = Arc::clone(&capturer);
        let capture_cancel = cancel.clone();
        match tokio::task::spawn_blocking(move || cap.capture(&capture_cancel)).await {
            Ok(Ok(image)) => {
                stats.captured += 1;
                let body = UploadBody {
                    kind,
                    employee_id: spec.employee_id.clone(),
                    payload: STANDARD.encode(&image),
                    timestamp: format_wire(&captured_at),
                };
                match uploader.upload(body).await {
                    Ok(status) => {
                        stats.delivered += 1;
                        info!(%kind, status, bytes = image.len(), "capture delivered");
                    }
                    Err(e) => {
                        stats.delivery_failed += 1;
                        error!(%kind, error = %e, "delivery failed; capture dropped");
                    }
                }
            }
            Ok(Err(CaptureError::Cancelled)) => {
                info!(%kind, "capture interrupted by stop");
                break;
            }
            Ok(Err(e)) => {
                stats.capture_failed += 1;
                warn!(%kind, error = %e, "capture skipped");
            }
            Err(e) => {
                stats.capture_failed += 1;
                error!(%kind, error = %e, "capture task panicked");
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(spec.interval) => {}
        }
    }

    info!(%kind, ?stats, "worker stopped");
    stats
}

/// Owns the running workers and the stop signal they share.
pub struct Workers {
    cancel: CancellationToken,
    handles: Vec<(CaptureKind, JoinHandle<WorkerStats>)>,
}

impl Workers {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            handles: Vec::new(),
        }
    }

    pub fn spawn<C: Capturer, U: Uploader>(&mut self, spec: WorkerSpec, capturer: Arc<C>, uploader: Arc<U>) {
        let kind = spec.kind;
        let handle = tokio::spawn(run_worker(spec, capturer, uploader, self.cancel.child_token()));
        self.handles.push((kind, handle));
    }

    /// Signal every worker to stop and wait up to `timeout` for each one.
    ///
    /// Workers that do not finish in time are left behind; `None` marks them.
    pub async fn shutdown(self, timeout: Duration) -> Vec<(CaptureKind, Option<WorkerStats>)> {
        self.cancel.cancel();
        let mut results = Vec::with_capacity(self.handles.len());
        for (kind, handle) in self.handles {
            let stats = match tokio::time::timeout(timeout, handle).await {
                Ok(Ok(stats)) => Some(stats),
                Ok(Err(e)) => {
                    error!(%kind, error = %e, "worker task failed");
                    None
                }
                Err(_) => {
                    warn!(%kind, timeout_secs = timeout.as_secs(), "worker did not stop in time");
                    None
                }
            };
            results.push((kind, stats));
        }
        results
    }
}

/// Drive `future` on a fresh multi-threaded runtime.
///
/// Blocking captures still running once it completes get `grace` to finish;
/// after that the runtime is dropped without them, so a hung device read
/// cannot keep the process alive.
pub fn block_on_bounded<F: Future>(future: F, grace: Duration) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(grace);
    Ok(output)
}
