//! Upload of captured images to vigil-server.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use vigil_types::{CaptureKind, UploadBody};

use crate::error::DeliveryError;

/// Longest slice of an error response body kept for the log.
const MAX_ERROR_BODY: usize = 512;

pub trait Uploader: Send + Sync + 'static {
    /// POST one capture once. Returns the HTTP status on success.
    fn upload(&self, body: UploadBody) -> impl Future<Output = Result<u16, DeliveryError>> + Send;
}

/// JSON-over-HTTP uploader sharing one connection pool between workers.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: Client,
    base_url: String,
}

impl HttpUploader {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vigil-agent/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn endpoint(&self, kind: CaptureKind) -> String {
        format!("{}{}", self.base_url, kind.upload_path())
    }
}

impl Uploader for HttpUploader {
    async fn upload(&self, body: UploadBody) -> Result<u16, DeliveryError> {
        let url = self.endpoint(body.kind);
        debug!(%url, bytes = body.payload.len(), "posting capture");
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(status.as_u16());
        }
        let mut text = response.text().await.unwrap_or_default();
        if text.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
        }
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body: text,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<Value>>>;

    async fn serve(status: StatusCode) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let handler = move |State(seen): State<Seen>, Json(body): Json<Value>| async move {
            seen.lock().unwrap().push(body);
            (status, Json(serde_json::json!({"status": "whatever", "message": "x"})))
        };
        let app = Router::new()
            .route("/api/upload_screenshot", post(handler.clone()))
            .route("/api/upload_frame", post(handler))
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{addr}/"), seen)
    }

    fn body(kind: CaptureKind) -> UploadBody {
        UploadBody {
            kind,
            employee_id: "e1".into(),
            payload: "aGk=".into(),
            timestamp: "2024-01-01T00:00:00.000000Z".into(),
        }
    }

    #[tokio::test]
    async fn posts_json_to_kind_endpoint() {
        let (base, seen) = serve(StatusCode::CREATED).await;
        let uploader = HttpUploader::new(&base, Duration::from_secs(5)).unwrap();

        assert_eq!(uploader.upload(body(CaptureKind::Frame)).await.unwrap(), 201);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["frame"], "aGk=");
        assert_eq!(seen[0]["employee_id"], "e1");
    }

    #[tokio::test]
    async fn non_2xx_is_a_delivery_error() {
        let (base, _) = serve(StatusCode::INTERNAL_SERVER_ERROR).await;
        let uploader = HttpUploader::new(&base, Duration::from_secs(5)).unwrap();
        match uploader.upload(body(CaptureKind::Screenshot)).await {
            Err(DeliveryError::Status { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_delivery_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let uploader = HttpUploader::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        assert!(matches!(
            uploader.upload(body(CaptureKind::Screenshot)).await,
            Err(DeliveryError::Http(_))
        ));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let uploader = HttpUploader::new("http://host:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(uploader.endpoint(CaptureKind::Screenshot), "http://host:5000/api/upload_screenshot");
    }
}
