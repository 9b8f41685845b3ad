use std::sync::Arc;
use std::time::{Duration, Instant};

use colcap_common::types::Task;
use colcap_store::CoordinationStore;
use futures::stream::{self, StreamExt};

use crate::correlate::Correlator;
use crate::nlp::SentimentAnalyzer;
use crate::pipeline::{process_task, TaskOutcome};
use crate::telemetry::Telemetry;

const BATCH_SIZE: usize = 4;
const POOL_WIDTH: usize = 4;
const BLOCKING_POP_TIMEOUT: Duration = Duration::from_secs(2);

pub struct BatchEngine {
    store: Arc<dyn CoordinationStore>,
    http: reqwest::Client,
    correlator: Correlator,
    analyzer: Box<dyn SentimentAnalyzer>,
    telemetry: Telemetry,
    worker_id: String,
}

impl BatchEngine {
    pub fn new(
        store: Arc<dyn CoordinationStore>,
        http: reqwest::Client,
        correlator: Correlator,
        analyzer: Box<dyn SentimentAnalyzer>,
        worker_id: String,
    ) -> Self {
        let telemetry = Telemetry::new(store.clone(), worker_id.clone());
        Self {
            store,
            http,
            correlator,
            analyzer,
            telemetry,
            worker_id,
        }
    }

    /// One iteration of the main loop: build a batch, fan it out, and
    /// report how many tasks were processed/skipped this round. Returns
    /// `false` when the batch was empty (idle tick), `true` otherwise, so
    /// the caller can decide whether to loop immediately or back off.
    pub async fn run_once(&self) -> bool {
        let batch = self.claim_batch().await;

        if batch.is_empty() {
            self.telemetry.refresh_heartbeat(0.0, 0, 0).await;
            return false;
        }

        let round_started = Instant::now();
        let outcomes: Vec<TaskOutcome> = stream::iter(batch.iter())
            .map(|task| async move {
                process_task(
                    &self.http,
                    &self.store,
                    &self.correlator,
                    self.analyzer.as_ref(),
                    &self.worker_id,
                    task,
                )
                .await
            })
            .buffer_unordered(POOL_WIDTH)
            .collect()
            .await;

        let mut processed = 0u64;
        let mut skipped = 0u64;
        let mut errors = 0u64;
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Processed(record) => {
                    processed += 1;
                    self.telemetry.increment_processed().await;
                    self.telemetry.push_correlation(&record.date, record.index_value).await;
                    self.telemetry.push_result(&record).await;
                }
                TaskOutcome::Skipped => {
                    skipped += 1;
                    self.telemetry.increment_skipped().await;
                }
                TaskOutcome::Error(e) => {
                    errors += 1;
                    tracing::warn!(error = %e, "task failed");
                    self.telemetry.increment_errors().await;
                }
            }
        }

        let elapsed_min = round_started.elapsed().as_secs_f64() / 60.0;
        let rate = if elapsed_min > 0.0 {
            processed as f64 / elapsed_min
        } else {
            0.0
        };
        self.telemetry.refresh_heartbeat(rate, errors, processed).await;

        tracing::info!(processed, skipped, errors, "batch completed");
        true
    }

    async fn claim_batch(&self) -> Vec<Task> {
        let mut batch = Vec::new();
        for _ in 0..BATCH_SIZE {
            match self.store.pop_head("warc_queue").await {
                Some(raw) => match serde_json::from_str::<Task>(&raw) {
                    Ok(task) => batch.push(task),
                    Err(e) => tracing::warn!(error = %e, "skipping malformed queue entry"),
                },
                None => break,
            }
        }

        if batch.is_empty() {
            if let Some(raw) = self
                .store
                .pop_head_blocking("warc_queue", BLOCKING_POP_TIMEOUT)
                .await
            {
                if let Ok(task) = serde_json::from_str::<Task>(&raw) {
                    batch.push(task);
                }
            }
        }

        batch
    }
}
