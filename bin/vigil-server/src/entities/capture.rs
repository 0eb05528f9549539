use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;
use vigil_types::CaptureKind;

use crate::entities::{dao::CaptureRecord, SqliteStore};

type CaptureRow = (String, String, String, Vec<u8>, String, String);

pub trait CaptureStore: Send + Sync + 'static {
    /// Append one record in a single statement.
    fn insert_capture(&self, record: CaptureRecord) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Distinct source ids across both kinds, in lexicographic order.
    fn list_sources(&self) -> impl Future<Output = Result<Vec<String>, sqlx::Error>> + Send;

    /// At most `limit` records of `kind` for `employee_id`, newest first.
    fn recent_captures(
        &self,
        kind: CaptureKind,
        employee_id: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<CaptureRecord>, sqlx::Error>> + Send;

    fn count_captures(&self) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;
}

/// Fixed-width UTC form, so that text order in SQLite is chronological order.
fn storage_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

fn parse_stored(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| warn!(raw = %raw, error = %e, "unparseable stored timestamp"))
        .ok()
}

fn from_row((id, kind, employee_id, image, captured_at, received_at): CaptureRow) -> Option<CaptureRecord> {
    let parsed_id = id
        .parse::<Uuid>()
        .map_err(|e| warn!(id = %id, error = %e, "skipping capture row with invalid id"))
        .ok()?;
    let kind = CaptureKind::from_str(&kind)
        .map_err(|_| warn!(id = %id, kind = %kind, "skipping capture row with unknown kind"))
        .ok()?;
    Some(CaptureRecord {
        id: parsed_id,
        kind,
        employee_id,
        image,
        captured_at: parse_stored(&captured_at)?,
        received_at: parse_stored(&received_at)?,
    })
}

impl CaptureStore for SqliteStore {
    async fn insert_capture(&self, record: CaptureRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO capture_records (id, kind, employee_id, image, captured_at, received_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(record.id.to_string())
        .bind(record.kind.as_str())
        .bind(&record.employee_id)
        .bind(&record.image)
        .bind(storage_timestamp(&record.captured_at))
        .bind(storage_timestamp(&record.received_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_sources(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT employee_id FROM capture_records ORDER BY employee_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn recent_captures(
        &self,
        kind: CaptureKind,
        employee_id: &str,
        limit: u32,
    ) -> Result<Vec<CaptureRecord>, sqlx::Error> {
        let rows: Vec<CaptureRow> = sqlx::query_as(
            "SELECT id, kind, employee_id, image, captured_at, received_at \
             FROM capture_records WHERE kind = ?1 AND employee_id = ?2 \
             ORDER BY captured_at DESC LIMIT ?3",
        )
        .bind(kind.as_str())
        .bind(employee_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().filter_map(from_row).collect())
    }

    async fn count_captures(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM capture_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record(kind: CaptureKind, employee_id: &str, captured_at: DateTime<Utc>) -> CaptureRecord {
        CaptureRecord {
            id: Uuid::new_v4(),
            kind,
            employee_id: employee_id.to_owned(),
            image: vec![0x89, b'P', b'N', b'G'],
            captured_at,
            received_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_then_read_back() {
        let store = SqliteStore::in_memory().await.unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let rec = record(CaptureKind::Screenshot, "e1", ts);
        store.insert_capture(rec.clone()).await.unwrap();

        let got = store.recent_captures(CaptureKind::Screenshot, "e1", 50).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, rec.id);
        assert_eq!(got[0].image, rec.image);
        assert_eq!(got[0].captured_at, ts);
        assert!(store.recent_captures(CaptureKind::Frame, "e1", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let store = SqliteStore::in_memory().await.unwrap();
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        for offset in [0, 3, 1, 4, 2] {
            let ts = base + Duration::hours(offset * 21);
            store.insert_capture(record(CaptureKind::Frame, "e1", ts)).await.unwrap();
        }
        let got = store.recent_captures(CaptureKind::Frame, "e1", 3).await.unwrap();
        assert_eq!(got.len(), 3);
        assert!(got.windows(2).all(|w| w[0].captured_at > w[1].captured_at));
        assert_eq!(got[0].captured_at, base + Duration::hours(84));
    }

    #[tokio::test]
    async fn sources_are_distinct_across_kinds() {
        let store = SqliteStore::in_memory().await.unwrap();
        let now = Utc::now();
        store.insert_capture(record(CaptureKind::Screenshot, "zed", now)).await.unwrap();
        store.insert_capture(record(CaptureKind::Frame, "zed", now)).await.unwrap();
        store.insert_capture(record(CaptureKind::Frame, "alice", now)).await.unwrap();
        store.insert_capture(record(CaptureKind::Screenshot, "alice", now)).await.unwrap();
        assert_eq!(store.list_sources().await.unwrap(), vec!["alice", "zed"]);
        assert_eq!(store.count_captures().await.unwrap(), 4);
    }
}
