//! Unauthenticated ingestion endpoints used by the capture agent.
//!
//! `/api/upload_screenshot` and `/api/upload_frame` share one handler,
//! parameterised by [`CaptureKind`].

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;
use vigil_types::{parse_timestamp, ApiStatus, CaptureKind, UploadRequest, MISSING_DATA};

use crate::entities::{CaptureRecord, CaptureStore};
use crate::error::ServerError;
use crate::state::AppState;

pub fn router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(CaptureKind::Screenshot.upload_path(), post(upload_screenshot))
        .route(CaptureKind::Frame.upload_path(), post(upload_frame))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

pub async fn upload_screenshot(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiStatus>), ServerError> {
    ingest(&state, CaptureKind::Screenshot, body).await
}

pub async fn upload_frame(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiStatus>), ServerError> {
    ingest(&state, CaptureKind::Frame, body).await
}

/// An upload that passed validation.
#[derive(Debug)]
pub struct ValidUpload {
    pub employee_id: String,
    pub image: Vec<u8>,
    pub captured_at: DateTime<Utc>,
}

/// Check that all three fields are present and well formed.
pub fn validate(kind: CaptureKind, req: &UploadRequest) -> Result<ValidUpload, ServerError> {
    let missing = || ServerError::BadRequest(MISSING_DATA.to_owned());
    // Stored exactly as sent; the dashboard looks sources up by this value.
    let employee_id = req
        .employee_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(missing)?;
    let payload = req.payload(kind).filter(|s| !s.is_empty()).ok_or_else(missing)?;
    let timestamp = req
        .timestamp
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(missing)?;

    let captured_at = parse_timestamp(timestamp)
        .map_err(|_| ServerError::BadRequest("Invalid timestamp".to_owned()))?;
    let image = STANDARD
        .decode(payload.trim())
        .map_err(|_| ServerError::BadRequest("Invalid image encoding".to_owned()))?;
    if image.is_empty() {
        return Err(missing());
    }

    Ok(ValidUpload {
        employee_id: employee_id.to_owned(),
        image,
        captured_at,
    })
}

async fn ingest(
    state: &AppState,
    kind: CaptureKind,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiStatus>), ServerError> {
    let Json(req) = body.map_err(|rejection| {
        debug!(kind = %kind, error = %rejection, "unreadable upload body");
        ServerError::BadRequest(MISSING_DATA.to_owned())
    })?;
    let upload = validate(kind, &req)?;

    let record = CaptureRecord {
        id: Uuid::new_v4(),
        kind,
        employee_id: upload.employee_id,
        image: upload.image,
        captured_at: upload.captured_at,
        received_at: Utc::now(),
    };
    let (id, bytes) = (record.id, record.image.len());
    let employee_id = record.employee_id.clone();
    state.store.insert_capture(record).await?;
    info!(kind = %kind, employee_id = %employee_id, %id, bytes, "capture stored");

    let message = match kind {
        CaptureKind::Screenshot => "Screenshot uploaded",
        CaptureKind::Frame => "Frame uploaded",
    };
    Ok((StatusCode::CREATED, Json(ApiStatus::success(message))))
}
