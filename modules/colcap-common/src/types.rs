use serde::{Deserialize, Serialize};

/// A unit of work popped from `warc_queue`. Archive fields are empty
/// sentinels for fallback (portal-scraped) tasks.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Task {
    pub url: String,
    pub domain: String,
    pub timestamp: String,
    #[serde(default)]
    pub archive_file: String,
    #[serde(default)]
    pub byte_offset: u64,
    #[serde(default)]
    pub byte_length: u64,
}

impl Task {
    pub fn has_archive_location(&self) -> bool {
        !self.archive_file.is_empty()
    }
}

/// Per-worker liveness record stored as a hash at `worker_stats:<id>`, TTL 15s.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkerHeartbeat {
    pub worker_id: String,
    pub rate: f64,
    pub errors: u64,
    pub processed: u64,
    pub last_active: i64,
}

/// Snapshot pushed into `throughput_history`, capped at 400 entries.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ThroughputSnapshot {
    pub ts: i64,
    pub active_workers: u32,
    pub aggregate_rate: f64,
    pub processed_total: u64,
}

/// Entry in `scalability_changes`, appended only on a new even worker count.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ScalabilityEntry {
    pub ts: i64,
    pub worker_count: u32,
    pub rate: f64,
}

/// Speedup/efficiency derived from a `ScalabilityEntry`, relative to the
/// entry with the smallest worker_count.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ScalabilityDerived {
    pub worker_count: u32,
    pub rate: f64,
    pub speedup: f64,
    pub efficiency_pct: f64,
}

/// Classification bucket produced by a `SentimentAnalyzer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Positivo,
    Neutral,
    Negativo,
}

impl std::fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SentimentClass::Positivo => "positivo",
            SentimentClass::Neutral => "neutral",
            SentimentClass::Negativo => "negativo",
        };
        write!(f, "{s}")
    }
}

/// Sentiment/keyword tally for a single article.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SentimentResult {
    pub polarity: f64,
    pub subjectivity: f64,
    pub classification: SentimentClass,
    pub confidence: f64,
    pub keywords: Vec<String>,
}

/// Per-stage timing breakdown, in milliseconds, attached to a `ResultRecord`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Timings {
    pub fetch_ms: u64,
    pub extract_ms: u64,
    pub analyze_ms: u64,
    pub total_ms: u64,
}

/// A fully processed article, pushed to `resultados_dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ResultRecord {
    pub url: String,
    pub title: String,
    pub domain: String,
    pub date: String,
    pub index_value: f64,
    pub sentiment: SentimentClass,
    pub keywords: Vec<String>,
    pub text_excerpt: String,
    pub text_length: usize,
    pub source: String,
    pub timings: Timings,
    pub worker_id: String,
    pub processed_at: i64,
}

/// Entry in `producer_logs`, capped at 200.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ProducerLogEntry {
    pub ts: i64,
    pub level: String,
    pub msg: String,
}

/// Periodic full-system snapshot pushed to `metrics_history`, capped at 500.
/// Broader than `ThroughputSnapshot`: includes the cumulative counters
/// alongside the point-in-time throughput reading.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MetricsSnapshot {
    pub ts: i64,
    pub active_workers: u32,
    pub aggregate_rate: f64,
    pub total_processed: u64,
    pub total_errors: u64,
    pub total_skipped: u64,
    pub colcap_news_counter: u64,
}

/// Snapshot of the monotone counters persisted in the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GlobalCounters {
    pub total_processed: u64,
    pub total_errors: u64,
    pub total_skipped: u64,
    pub colcap_news_counter: u64,
}

/// One row of `CC-MAIN-*` collection metadata from `collinfo.json`, and the
/// shape cached locally at `data/cc_indexes.csv`.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ArchiveIndexRef {
    pub id: String,
    pub name: String,
    pub cdx_api: String,
}

/// A single record in a CDX newline-delimited query response.
#[derive(Debug, Clone, Deserialize)]
pub struct CdxRecord {
    pub url: String,
    pub filename: String,
    pub offset: String,
    pub length: String,
    pub timestamp: String,
}
