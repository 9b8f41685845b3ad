use std::sync::Arc;
use std::time::Duration;

use colcap_store::CoordinationStore;

use crate::log_stream::LogStream;

const LOW_THRESHOLD: u64 = 50;
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Blocks until `warc_queue`'s depth is at or below `LOW_THRESHOLD`, so
/// recently-indexed content gets processed before it ages out of the
/// producer's dedup horizon. No-op if the queue is already drained enough.
pub async fn wait_for_drain(store: &Arc<dyn CoordinationStore>, logs: &LogStream) {
    loop {
        let depth = store.len("warc_queue").await;
        if depth <= LOW_THRESHOLD {
            return;
        }
        logs.info(&format!("backpressure: queue depth {depth} > {LOW_THRESHOLD}, waiting"))
            .await;
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colcap_store::MemoryStore;
    use tokio::time::timeout;

    #[tokio::test]
    async fn returns_immediately_when_queue_is_small() {
        let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());
        let logs = LogStream::new(store.clone());
        store.push_head("warc_queue", "a").await;

        let result = timeout(Duration::from_millis(50), wait_for_drain(&store, &logs)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn blocks_while_queue_exceeds_threshold() {
        let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());
        let logs = LogStream::new(store.clone());
        for i in 0..60 {
            store.push_head("warc_queue", &i.to_string()).await;
        }

        let result = timeout(Duration::from_millis(50), wait_for_drain(&store, &logs)).await;
        assert!(result.is_err(), "should still be blocked above threshold");
    }
}
