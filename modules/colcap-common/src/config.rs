use std::env;

/// Application configuration loaded from environment variables. Fields are a
/// superset across all three binaries; each binary's `*_from_env` constructor
/// only populates what it needs, leaving the rest at their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    // Coordination store
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: i64,

    // Worker
    pub worker_id: String,
    pub worker_timeout_secs: u64,

    // Data
    pub colcap_data_path: String,

    // Producer pacing
    pub delay_between_indexes_secs: u64,
    pub delay_between_domains_secs: u64,

    // Target domains for both discovery strategies
    pub target_domains: Vec<String>,

    // Retry
    pub max_retries: u32,
    pub retry_delay_secs: u64,

    // Dashboard
    pub dashboard_max_results: usize,
}

const DEFAULT_DOMAINS: &str = "eltiempo.com,elespectador.com,portafolio.co,larepublica.co";

impl Config {
    fn base() -> Self {
        Self {
            redis_host: env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string()),
            redis_port: env::var("REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6379),
            redis_db: env::var("REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            worker_id: env::var("HOSTNAME").unwrap_or_else(|_| "worker-local".to_string()),
            worker_timeout_secs: env::var("WORKER_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            colcap_data_path: env::var("COLCAP_DATA_PATH")
                .unwrap_or_else(|_| "data/colcap_historico.csv".to_string()),
            delay_between_indexes_secs: env::var("DELAY_BETWEEN_INDEXES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            delay_between_domains_secs: env::var("DELAY_BETWEEN_DOMAINS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            target_domains: env::var("TARGET_DOMAINS")
                .unwrap_or_else(|_| DEFAULT_DOMAINS.to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            max_retries: env::var("MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            retry_delay_secs: env::var("RETRY_DELAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            dashboard_max_results: env::var("DASHBOARD_MAX_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
        }
    }

    /// Load config for the producer binary.
    pub fn producer_from_env() -> Self {
        Self::base()
    }

    /// Load config for the worker binary.
    pub fn worker_from_env() -> Self {
        Self::base()
    }

    /// Load config for the dashboard binary.
    pub fn dashboard_from_env() -> Self {
        Self::base()
    }

    /// Log non-sensitive configuration at startup.
    pub fn log_summary(&self) {
        tracing::info!(
            redis_host = self.redis_host.as_str(),
            redis_port = self.redis_port,
            domains = self.target_domains.join(","),
            "configuration loaded"
        );
    }
}
