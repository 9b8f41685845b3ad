use std::sync::Arc;

use colcap_common::types::{ScalabilityDerived, ScalabilityEntry};
use colcap_store::CoordinationStore;

/// Appends to `scalability_changes` only when `active_workers` is nonzero,
/// even, and differs from the last recorded worker count — an intentional
/// downsampling rule per spec.md §9, not something to second-guess here.
pub async fn maybe_record_change(store: &Arc<dyn CoordinationStore>, active_workers: u32, rate: f64) {
    if active_workers == 0 || active_workers % 2 != 0 {
        return;
    }

    let last = store
        .get("last_worker_count")
        .await
        .and_then(|v| v.parse::<u32>().ok());
    if last == Some(active_workers) {
        return;
    }

    let entry = ScalabilityEntry {
        ts: chrono::Utc::now().timestamp(),
        worker_count: active_workers,
        rate,
    };
    if let Ok(json) = serde_json::to_string(&entry) {
        store.push_head("scalability_changes", &json).await;
    }
    store
        .set("last_worker_count", &active_workers.to_string())
        .await;
}

const CHANGE_LOG_READ_LIMIT: usize = 1000;

pub async fn change_log(store: &Arc<dyn CoordinationStore>) -> Vec<ScalabilityEntry> {
    store
        .peek_head("scalability_changes", CHANGE_LOG_READ_LIMIT)
        .await
        .into_iter()
        .filter_map(|raw| serde_json::from_str(&raw).ok())
        .collect()
}

/// Derive speedup/efficiency from a client-held copy of the change log.
/// `speedup(entry) = entry.rate / baseline`, where `baseline =
/// rate/worker_count` of the entry with the smallest worker_count;
/// `efficiency = speedup / worker_count * 100`.
pub fn derive(entries: &[ScalabilityEntry]) -> Vec<ScalabilityDerived> {
    let Some(baseline_entry) = entries.iter().min_by_key(|e| e.worker_count) else {
        return Vec::new();
    };
    let baseline = baseline_entry.rate / baseline_entry.worker_count as f64;
    if baseline <= 0.0 {
        return Vec::new();
    }

    entries
        .iter()
        .map(|e| {
            let speedup = e.rate / baseline;
            ScalabilityDerived {
                worker_count: e.worker_count,
                rate: e.rate,
                speedup,
                efficiency_pct: speedup / e.worker_count as f64 * 100.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use colcap_store::MemoryStore;

    #[tokio::test]
    async fn records_only_even_worker_counts_that_changed() {
        let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());

        maybe_record_change(&store, 3, 10.0).await;
        assert_eq!(store.len("scalability_changes").await, 0);

        maybe_record_change(&store, 4, 20.0).await;
        assert_eq!(store.len("scalability_changes").await, 1);

        maybe_record_change(&store, 4, 25.0).await;
        assert_eq!(store.len("scalability_changes").await, 1);

        maybe_record_change(&store, 6, 30.0).await;
        assert_eq!(store.len("scalability_changes").await, 2);
    }

    #[test]
    fn derives_speedup_and_efficiency_relative_to_smallest_worker_count() {
        let entries = vec![
            ScalabilityEntry { ts: 0, worker_count: 2, rate: 10.0 },
            ScalabilityEntry { ts: 1, worker_count: 4, rate: 18.0 },
            ScalabilityEntry { ts: 2, worker_count: 8, rate: 30.0 },
        ];
        let derived = derive(&entries);
        let baseline = 10.0 / 2.0;

        assert_eq!(derived[0].speedup, 1.0);
        assert_eq!(derived[0].efficiency_pct, 50.0);

        let expected_speedup_4 = 18.0 / baseline;
        assert!((derived[1].speedup - expected_speedup_4).abs() < 1e-9);
    }

    #[test]
    fn empty_change_log_derives_nothing() {
        assert!(derive(&[]).is_empty());
    }
}
