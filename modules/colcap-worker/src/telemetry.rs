use std::sync::Arc;

use colcap_common::types::{ResultRecord, WorkerHeartbeat};
use colcap_store::CoordinationStore;

const HEARTBEAT_TTL_SECS: i64 = 15;
const CORRELATION_HISTORY_CAP: usize = 1000;
const RESULT_STREAM_CAP: usize = 500;

/// Worker-side telemetry writers. All failures are swallowed here per
/// spec.md §7 "coordination failures inside telemetry paths → swallow
/// silently" — the underlying `CoordinationStore` already never returns an
/// `Err` for op failures, so this module's job is just to shape the writes.
pub struct Telemetry {
    store: Arc<dyn CoordinationStore>,
    worker_id: String,
}

impl Telemetry {
    pub fn new(store: Arc<dyn CoordinationStore>, worker_id: String) -> Self {
        Self { store, worker_id }
    }

    pub async fn refresh_heartbeat(&self, rate: f64, errors: u64, processed: u64) {
        let key = format!("worker_stats:{}", self.worker_id);
        let heartbeat = WorkerHeartbeat {
            worker_id: self.worker_id.clone(),
            rate,
            errors,
            processed,
            last_active: now_ts(),
        };
        self.store.hash_set(&key, "rate", &heartbeat.rate.to_string()).await;
        self.store.hash_set(&key, "errors", &heartbeat.errors.to_string()).await;
        self.store.hash_set(&key, "processed", &heartbeat.processed.to_string()).await;
        self.store
            .hash_set(&key, "last_active", &heartbeat.last_active.to_string())
            .await;
        self.store.expire(&key, HEARTBEAT_TTL_SECS).await;
    }

    pub async fn increment_processed(&self) {
        self.store.incr("total_processed").await;
        // Persistent per-worker lifetime total, unlike worker_stats:<id>
        // which expires 15s after the worker stops heartbeating.
        self.store
            .incr(&format!("worker_history:{}", self.worker_id))
            .await;
    }

    pub async fn increment_errors(&self) {
        self.store.incr("total_errors").await;
    }

    pub async fn increment_skipped(&self) {
        self.store.incr("total_skipped").await;
    }

    pub async fn push_result(&self, record: &ResultRecord) {
        if let Ok(json) = serde_json::to_string(record) {
            self.store.push_head("resultados_dashboard", &json).await;
            self.store
                .trim_head("resultados_dashboard", RESULT_STREAM_CAP)
                .await;
        }
    }

    pub async fn push_correlation(&self, date: &str, index_value: f64) {
        let entry = serde_json::json!({ "date": date, "index_value": index_value, "ts": now_ts() });
        self.store
            .push_head("correlaciones_history", &entry.to_string())
            .await;
        self.store
            .trim_head("correlaciones_history", CORRELATION_HISTORY_CAP)
            .await;
    }
}

fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}
