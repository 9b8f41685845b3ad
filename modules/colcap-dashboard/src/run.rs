use std::sync::Arc;
use std::time::Duration;

use colcap_common::Config;
use colcap_store::{CoordinationStore, RedisStore};

use crate::{scalability, snapshot};

/// Entry point shared by the standalone `dashboard` binary and `colcap
/// dashboard`: prints one point-in-time text snapshot and exits.
pub async fn run() -> anyhow::Result<()> {
    let config = Config::dashboard_from_env();

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
            println!("disconnected: {e}");
            std::process::exit(1);
        }
    };

    let workers = snapshot::live_workers(&store).await;
    let counters = snapshot::global_counters(&store).await;
    let tp = snapshot::record_throughput_snapshot(&store).await;
    let changes = scalability::change_log(&store).await;
    let derived = scalability::derive(&changes);

    println!("== colcap dashboard snapshot ==");
    println!(
        "live workers: {} (aggregate rate {:.2}/min)",
        workers.len(),
        tp.aggregate_rate
    );
    for w in &workers {
        println!(
            "  {:<20} rate={:.2}/min processed={} errors={}",
            w.worker_id, w.rate, w.processed, w.errors
        );
    }
    println!(
        "totals: processed={} errors={} skipped={} news_counter={}",
        counters.total_processed,
        counters.total_errors,
        counters.total_skipped,
        counters.colcap_news_counter
    );
    println!("scalability:");
    for entry in &derived {
        println!(
            "  workers={:<3} rate={:.2} speedup={:.2}x efficiency={:.1}%",
            entry.worker_count, entry.rate, entry.speedup, entry.efficiency_pct
        );
    }

    Ok(())
}
