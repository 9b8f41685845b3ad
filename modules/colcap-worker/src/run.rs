use std::sync::Arc;
use std::time::Duration;

use colcap_common::{Config, HistoricalTable};
use colcap_store::{CoordinationStore, RedisStore};

use crate::{BatchEngine, Correlator, KeywordLexiconAnalyzer};

/// Entry point shared by the standalone `worker` binary and `colcap worker`.
pub async fn run() -> anyhow::Result<()> {
    let config = Config::worker_from_env();
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

    let historical = match HistoricalTable::load(&config.colcap_data_path) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(error = %e, "could not load historical index table, exiting");
            std::process::exit(1);
        }
    };

    let correlator = Correlator::new(historical);
    let http = crate::fetch::build_client();
    let analyzer = Box::new(KeywordLexiconAnalyzer);

    tracing::info!(worker_id = %config.worker_id, "worker starting");

    let engine = BatchEngine::new(store, http, correlator, analyzer, config.worker_id.clone());

    // `run_once` is never raced against the interrupt signal directly —
    // doing so would cancel an in-flight fetch/decode/analyze pipeline and
    // strand an already-claimed task. Instead ctrl_c is checked at each
    // iteration boundary with `biased` priority so a signal that arrived
    // while the previous batch was running is caught before the next one
    // starts, matching spec.md §9's "active batch completes, then loop
    // exits, no re-queuing" — the same place the original catches
    // `KeyboardInterrupt` around its own per-batch loop
    // (`original_source/src/worker/main.py`).
    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received, stopping after current batch");
                break;
            }
            _ = std::future::ready(()) => {}
        }
        engine.run_once().await;
    }

    Ok(())
}
