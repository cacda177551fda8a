use chrono::{DateTime, Utc};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Captures older than this are considered stale and evicted.
const SCREENSHOT_TTL_SECS: u64 = 300;
const SCREENSHOT_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct Screenshot {
    pub image_base64: String,
    pub captured_at: DateTime<Utc>,
}

/// Latest capture per employee. Monitoring is ad-hoc: nothing is persisted,
/// entries expire on their own.
static SCREENSHOT_CACHE: Lazy<Cache<u64, Screenshot>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(SCREENSHOT_CAPACITY)
        .time_to_live(Duration::from_secs(SCREENSHOT_TTL_SECS))
        .build()
});

pub async fn store(employee_id: u64, image_base64: String) -> Screenshot {
    let capture = Screenshot {
        image_base64,
        captured_at: Utc::now(),
    };
    SCREENSHOT_CACHE.insert(employee_id, capture.clone()).await;
    capture
}

pub async fn latest(employee_id: u64) -> Option<Screenshot> {
    SCREENSHOT_CACHE.get(&employee_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn stores_and_returns_latest_capture() {
        store(9001, "Zmlyc3Q=".into()).await;
        store(9001, "c2Vjb25k".into()).await;

        let capture = latest(9001).await.unwrap();
        assert_eq!(capture.image_base64, "c2Vjb25k");
        assert!(latest(9002).await.is_none());
    }
}
