//! End-to-end tests of the producer's orchestration layer against a
//! `MemoryStore`: backpressure, the three-strikes fallback latch, and
//! dedup via the shared `processed_urls` set, wired through the same
//! `FallbackOrchestrator`/`backpressure`/`LogStream` types `run.rs` drives.
//! The two HTTP-scraping `UrlDiscoverer` implementations point at real
//! portal/Common Crawl hosts and so aren't exercised here; their own
//! pagination/dedup math is covered in `colcap-discovery`'s unit tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use colcap_common::types::Task;
use colcap_common::ColcapError;
use colcap_discovery::{FallbackOrchestrator, UrlDiscoverer};
use colcap_producer::backpressure;
use colcap_producer::LogStream;
use colcap_store::{CoordinationStore, MemoryStore};
use tokio::time::timeout;

fn task(n: u32) -> Task {
    Task {
        url: format!("https://www.larepublica.co/economia/nota-{n}"),
        domain: "larepublica.co".to_string(),
        timestamp: "20240315120000".to_string(),
        archive_file: String::new(),
        byte_offset: 0,
        byte_length: 0,
    }
}

/// Stands in for an `ArchiveIndexDiscoverer`/`PortalScrapeDiscoverer`: reads
/// a scripted sequence of scan results, deduping each batch against the
/// store's `processed_urls` set exactly as the real discoverers do.
struct FakeDiscoverer {
    name: &'static str,
    store: Arc<dyn CoordinationStore>,
    scripted: Vec<Result<Vec<Task>, ()>>,
    call: AtomicU32,
}

#[async_trait]
impl UrlDiscoverer for FakeDiscoverer {
    async fn next_batch(&mut self) -> Result<Vec<Task>, ColcapError> {
        let idx = self.call.fetch_add(1, Ordering::Relaxed) as usize;
        match self.scripted.get(idx).cloned().unwrap_or(Ok(Vec::new())) {
            Err(()) => Err(ColcapError::Transport("fake discoverer failure".to_string())),
            Ok(candidates) => {
                let mut enqueued = Vec::new();
                for candidate in candidates {
                    if self.store.set_contains("processed_urls", &candidate.url).await {
                        continue;
                    }
                    self.store.set_add("processed_urls", &candidate.url).await;
                    self.store
                        .push_head("warc_queue", &serde_json::to_string(&candidate).unwrap())
                        .await;
                    enqueued.push(candidate);
                }
                Ok(enqueued)
            }
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[tokio::test]
async fn backpressure_blocks_until_queue_drains_below_threshold() {
    let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());
    let logs = LogStream::new(store.clone());
    for i in 0..60 {
        store.push_head("warc_queue", &i.to_string()).await;
    }

    let blocked = timeout(Duration::from_millis(50), backpressure::wait_for_drain(&store, &logs)).await;
    assert!(blocked.is_err(), "queue above threshold should still be waiting");

    for _ in 0..15 {
        store.pop_head("warc_queue").await;
    }
    let drained = timeout(Duration::from_secs(2), backpressure::wait_for_drain(&store, &logs)).await;
    assert!(drained.is_ok(), "queue at/under threshold should return promptly");
}

#[tokio::test]
async fn rescanning_the_same_discoverer_enqueues_no_duplicates() {
    let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());
    let candidates = vec![task(1), task(2), task(3)];
    let mut discoverer = FakeDiscoverer {
        name: "archive_index",
        store: store.clone(),
        scripted: vec![Ok(candidates.clone()), Ok(candidates)],
        call: AtomicU32::new(0),
    };

    let first = discoverer.next_batch().await.unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(store.set_size("processed_urls").await, 3);

    let second = discoverer.next_batch().await.unwrap();
    assert!(second.is_empty(), "a full rescan of already-processed urls should enqueue nothing new");
    assert_eq!(store.len("warc_queue").await, 3);
}

#[tokio::test]
async fn orchestrator_latches_to_fallback_after_three_failed_primary_scans_and_logs_it() {
    let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());
    let logs = LogStream::new(store.clone());

    let primary = Box::new(FakeDiscoverer {
        name: "archive_index",
        store: store.clone(),
        scripted: vec![Err(()), Err(()), Err(())],
        call: AtomicU32::new(0),
    });
    let fallback = Box::new(FakeDiscoverer {
        name: "portal",
        store: store.clone(),
        scripted: vec![Ok(vec![task(1)])],
        call: AtomicU32::new(0),
    });
    let mut orchestrator = FallbackOrchestrator::new(primary, fallback);

    for _ in 0..3 {
        let outcome = orchestrator.next_batch().await;
        assert!(outcome.is_err());
        logs.error(&format!("Error: {}", outcome.unwrap_err())).await;
    }
    assert!(orchestrator.is_latched_to_fallback());
    assert_eq!(orchestrator.active_strategy(), "portal");

    let batch = orchestrator.next_batch().await.unwrap();
    assert_eq!(batch.len(), 1);

    let logged = store.peek_head("producer_logs", 10).await;
    assert_eq!(logged.len(), 3, "each failed scan should have logged an error entry");
}
