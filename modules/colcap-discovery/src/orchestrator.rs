use colcap_common::types::Task;
use colcap_common::ColcapError;

use crate::UrlDiscoverer;

/// Holds the three-strikes counter and the latch between the two discovery
/// strategies. Once latched onto portal mode it never switches back, per
/// spec.md §4.2 "switch to portal mode and remain there".
pub struct FallbackOrchestrator {
    primary: Box<dyn UrlDiscoverer>,
    fallback: Box<dyn UrlDiscoverer>,
    consecutive_zero_yield: u32,
    latched_to_fallback: bool,
}

const STRIKES_BEFORE_FALLBACK: u32 = 3;

impl FallbackOrchestrator {
    pub fn new(primary: Box<dyn UrlDiscoverer>, fallback: Box<dyn UrlDiscoverer>) -> Self {
        Self {
            primary,
            fallback,
            consecutive_zero_yield: 0,
            latched_to_fallback: false,
        }
    }

    pub fn is_latched_to_fallback(&self) -> bool {
        self.latched_to_fallback
    }

    /// A failed scan still counts as a zero-yield strike toward the
    /// fallback latch (the original's `cc_failures` counts `found == 0`
    /// the same way whether it came from an empty result or a swallowed
    /// exception — `original_source/src/producer/main.py:116-121`), but
    /// unlike the original, the `Err` itself is propagated rather than
    /// swallowed, so `colcap-producer::run`'s caller can distinguish a
    /// quiet scan from a real failure for its backoff decision.
    pub async fn next_batch(&mut self) -> Result<Vec<Task>, ColcapError> {
        if self.latched_to_fallback {
            return self.fallback.next_batch().await;
        }

        let result = self.primary.next_batch().await;
        let is_zero_yield = matches!(&result, Ok(batch) if batch.is_empty()) || result.is_err();
        if is_zero_yield {
            self.consecutive_zero_yield += 1;
            if self.consecutive_zero_yield >= STRIKES_BEFORE_FALLBACK {
                tracing::warn!(
                    strikes = self.consecutive_zero_yield,
                    "primary discoverer went cold, latching to portal fallback"
                );
                self.latched_to_fallback = true;
            }
        } else {
            self.consecutive_zero_yield = 0;
        }
        result
    }

    pub fn active_strategy(&self) -> &'static str {
        if self.latched_to_fallback {
            self.fallback.name()
        } else {
            self.primary.name()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedDiscoverer {
        name: &'static str,
        yields: Vec<usize>,
        call: AtomicU32,
    }

    #[async_trait]
    impl UrlDiscoverer for ScriptedDiscoverer {
        async fn next_batch(&mut self) -> Result<Vec<Task>, ColcapError> {
            let idx = self.call.fetch_add(1, Ordering::Relaxed) as usize;
            let n = self.yields.get(idx).copied().unwrap_or(0);
            Ok((0..n)
                .map(|i| Task {
                    url: format!("https://example.com/economia/nota-{i}"),
                    domain: "example.com".to_string(),
                    timestamp: String::new(),
                    archive_file: String::new(),
                    byte_offset: 0,
                    byte_length: 0,
                })
                .collect())
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    #[tokio::test]
    async fn latches_after_three_consecutive_zero_yield_scans() {
        let primary = Box::new(ScriptedDiscoverer {
            name: "archive_index",
            yields: vec![0, 0, 0, 5],
            call: AtomicU32::new(0),
        });
        let fallback = Box::new(ScriptedDiscoverer {
            name: "portal",
            yields: vec![2],
            call: AtomicU32::new(0),
        });
        let mut orchestrator = FallbackOrchestrator::new(primary, fallback);

        for _ in 0..3 {
            let batch = orchestrator.next_batch().await.unwrap();
            assert!(batch.is_empty());
        }
        assert!(orchestrator.is_latched_to_fallback());
        assert_eq!(orchestrator.active_strategy(), "portal");

        let batch = orchestrator.next_batch().await.unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[tokio::test]
    async fn a_nonempty_scan_resets_the_strike_counter() {
        let primary = Box::new(ScriptedDiscoverer {
            name: "archive_index",
            yields: vec![0, 0, 1, 0, 0],
            call: AtomicU32::new(0),
        });
        let fallback = Box::new(ScriptedDiscoverer {
            name: "portal",
            yields: vec![],
            call: AtomicU32::new(0),
        });
        let mut orchestrator = FallbackOrchestrator::new(primary, fallback);

        for _ in 0..5 {
            let _ = orchestrator.next_batch().await;
        }
        assert!(!orchestrator.is_latched_to_fallback());
    }
}
