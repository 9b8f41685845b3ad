use std::sync::Arc;
use std::time::Duration;

use colcap_common::Config;
use colcap_discovery::{ArchiveIndexDiscoverer, FallbackOrchestrator, PortalScrapeDiscoverer};
use colcap_store::{CoordinationStore, RedisStore};

use crate::{backpressure, LogStream};

/// Non-fatal-exception backoff from spec.md §4.2, distinct from the normal
/// inter-domain pacing delay.
const ERROR_BACKOFF: Duration = Duration::from_secs(30);

/// Entry point shared by the standalone `producer` binary and `colcap producer`.
pub async fn run() -> anyhow::Result<()> {
    let config = Config::producer_from_env();
    config.log_summary();

    let redis_url = format!(
        "redis://{}:{}/{}",
        config.redis_host, config.redis_port, config.redis_db
    );
    let store: Arc<dyn CoordinationStore> = match RedisStore::connect(
        &redis_url,
        config.max_retries,
        Duration::from_secs(config.retry_delay_secs),
    )
    .await
    {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(error = %e, "could not connect to coordination store, exiting");
            std::process::exit(1);
        }
    };

    let logs = LogStream::new(store.clone());
    let http = reqwest::Client::new();

    let primary = match ArchiveIndexDiscoverer::bootstrap(http.clone(), store.clone(), &config).await {
        Ok(discoverer) => Box::new(discoverer),
        Err(e) => {
            tracing::error!(error = %e, "no archive indices loaded, producer cannot start");
            std::process::exit(1);
        }
    };
    let fallback = Box::new(PortalScrapeDiscoverer::new(http, store.clone(), &config));
    let mut orchestrator = FallbackOrchestrator::new(primary, fallback);

    logs.info("producer starting").await;

    // Checked at each iteration boundary, never mid-batch: ctrl_c cuts the
    // pacing sleep short but the batch already claimed always runs to
    // completion, per spec.md §9 "active batch completes, then loop exits,
    // no re-queuing" — mirroring the original's `except KeyboardInterrupt:
    // break` around the same loop body
    // (`original_source/src/producer/main.py:165-167`).
    loop {
        backpressure::wait_for_drain(&store, &logs).await;

        let sleep_duration = match orchestrator.next_batch().await {
            Ok(batch) => {
                if !batch.is_empty() {
                    logs.info(&format!(
                        "{} enqueued {} tasks",
                        orchestrator.active_strategy(),
                        batch.len()
                    ))
                    .await;
                }
                Duration::from_secs(config.delay_between_domains_secs)
            }
            Err(e) => {
                tracing::error!(error = %e, "discovery scan failed");
                logs.error(&format!("Error: {e}")).await;
                ERROR_BACKOFF
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                logs.info("interrupt received, stopping after current batch").await;
                break;
            }
            _ = tokio::time::sleep(sleep_duration) => {}
        }
    }

    Ok(())
}
