//! Dashboard queries: which sources exist, and what each one did recently.

use crate::entities::{CaptureRecord, CaptureStore};
use vigil_types::CaptureKind;

/// How many records of each kind the activity feed pulls.
pub const FEED_LIMIT_PER_KIND: u32 = 50;

/// Every source id seen in either kind, deduplicated and sorted.
pub async fn source_ids<S: CaptureStore>(store: &S) -> Result<Vec<String>, sqlx::Error> {
    store.list_sources().await
}

/// Most recent screenshots and frames of `employee_id`, merged newest first.
///
/// The two reads are independent; a record inserted in between may or may
/// not show up.
pub async fn activity_feed<S: CaptureStore>(
    store: &S,
    employee_id: &str,
) -> Result<Vec<CaptureRecord>, sqlx::Error> {
    let mut merged = Vec::with_capacity(2 * FEED_LIMIT_PER_KIND as usize);
    for kind in CaptureKind::ALL {
        merged.extend(store.recent_captures(kind, employee_id, FEED_LIMIT_PER_KIND).await?);
    }
    merged.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
    Ok(merged)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::SqliteStore;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    async fn seed(store: &SqliteStore, kind: CaptureKind, employee_id: &str, minutes: i64) {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store
            .insert_capture(CaptureRecord {
                id: Uuid::new_v4(),
                kind,
                employee_id: employee_id.to_owned(),
                image: vec![minutes as u8],
                captured_at: base + Duration::minutes(minutes),
                received_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn feed_interleaves_kinds_newest_first() {
        let store = SqliteStore::in_memory().await.unwrap();
        for m in [1, 4, 5] {
            seed(&store, CaptureKind::Screenshot, "e1", m).await;
        }
        for m in [2, 3, 6] {
            seed(&store, CaptureKind::Frame, "e1", m).await;
        }
        seed(&store, CaptureKind::Frame, "other", 10).await;

        let feed = activity_feed(&store, "e1").await.unwrap();
        let order: Vec<u8> = feed.iter().map(|r| r.image[0]).collect();
        assert_eq!(order, vec![6, 5, 4, 3, 2, 1]);
        assert!(feed.iter().all(|r| r.employee_id == "e1"));
    }

    #[tokio::test]
    async fn feed_takes_fifty_of_each_kind() {
        let store = SqliteStore::in_memory().await.unwrap();
        for m in 0..60 {
            seed(&store, CaptureKind::Screenshot, "busy", m).await;
        }
        for m in 100..105 {
            seed(&store, CaptureKind::Frame, "busy", m).await;
        }
        let feed = activity_feed(&store, "busy").await.unwrap();
        assert_eq!(feed.len(), 55);
        assert_eq!(feed.iter().filter(|r| r.kind == CaptureKind::Frame).count(), 5);
        // The ten oldest screenshots fall outside the window.
        let oldest = feed.last().unwrap();
        assert_eq!(oldest.captured_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 10, 0).unwrap());
        assert!(feed.windows(2).all(|w| w[0].captured_at > w[1].captured_at));
    }

    #[tokio::test]
    async fn unknown_source_has_empty_feed() {
        let store = SqliteStore::in_memory().await.unwrap();
        seed(&store, CaptureKind::Screenshot, "e1", 0).await;
        assert!(activity_feed(&store, "nobody").await.unwrap().is_empty());
        assert_eq!(source_ids(&store).await.unwrap(), vec!["e1"]);
    }
}
