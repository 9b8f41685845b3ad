use std::sync::Arc;

use colcap_common::types::{GlobalCounters, MetricsSnapshot, ThroughputSnapshot, WorkerHeartbeat};
use colcap_store::CoordinationStore;

const THROUGHPUT_HISTORY_CAP: usize = 400;
const METRICS_HISTORY_CAP: usize = 500;
const WORKER_STATS_PREFIX: &str = "worker_stats:*";

/// Enumerate every live worker heartbeat (absence via TTL expiry already
/// means "dead" — no separate reaper is implemented, per spec.md §9).
pub async fn live_workers(store: &Arc<dyn CoordinationStore>) -> Vec<WorkerHeartbeat> {
    let keys = store.scan_keys(WORKER_STATS_PREFIX).await;
    let mut workers = Vec::new();
    for key in keys {
        let fields = store.hash_get_all(&key).await;
        if fields.is_empty() {
            continue;
        }
        let worker_id = key.strip_prefix("worker_stats:").unwrap_or(&key).to_string();
        workers.push(WorkerHeartbeat {
            worker_id,
            rate: fields.get("rate").and_then(|v| v.parse().ok()).unwrap_or(0.0),
            errors: fields.get("errors").and_then(|v| v.parse().ok()).unwrap_or(0),
            processed: fields
                .get("processed")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            last_active: fields
                .get("last_active")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        });
    }
    workers
}

pub async fn global_counters(store: &Arc<dyn CoordinationStore>) -> GlobalCounters {
    let get = |key: &'static str| {
        let store = store.clone();
        async move {
            store
                .get(key)
                .await
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0)
        }
    };
    GlobalCounters {
        total_processed: get("total_processed").await,
        total_errors: get("total_errors").await,
        total_skipped: get("total_skipped").await,
        colcap_news_counter: get("colcap_news_counter").await,
    }
}

/// Records one throughput snapshot and, per spec.md §4.7's open question
/// (resolved in DESIGN.md), also performs the scalability-change-log
/// bookkeeping that the original coupled into the same refresh callback.
pub async fn record_throughput_snapshot(
    store: &Arc<dyn CoordinationStore>,
) -> ThroughputSnapshot {
    let workers = live_workers(store).await;
    let active_workers = workers.len() as u32;
    let aggregate_rate: f64 = workers.iter().map(|w| w.rate).sum();
    let counters = global_counters(store).await;
    let ts = chrono::Utc::now().timestamp();

    let snapshot = ThroughputSnapshot {
        ts,
        active_workers,
        aggregate_rate,
        processed_total: counters.total_processed,
    };

    let payload = serde_json::to_string(&snapshot).unwrap();
    store.push_head("throughput_history", &payload).await;
    store
        .trim_head("throughput_history", THROUGHPUT_HISTORY_CAP)
        .await;

    let metrics = MetricsSnapshot {
        ts,
        active_workers,
        aggregate_rate,
        total_processed: counters.total_processed,
        total_errors: counters.total_errors,
        total_skipped: counters.total_skipped,
        colcap_news_counter: counters.colcap_news_counter,
    };
    let metrics_payload = serde_json::to_string(&metrics).unwrap();
    store.push_head("metrics_history", &metrics_payload).await;
    store.trim_head("metrics_history", METRICS_HISTORY_CAP).await;

    crate::scalability::maybe_record_change(store, active_workers, aggregate_rate).await;

    snapshot
}
