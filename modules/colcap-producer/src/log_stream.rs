use std::sync::Arc;

use colcap_store::CoordinationStore;

const PRODUCER_LOG_CAP: usize = 200;

/// Pushes to the bounded `producer_logs` operational log stream consumed by
/// the monitoring view, independent of `tracing`'s own log output.
pub struct LogStream {
    store: Arc<dyn CoordinationStore>,
}

impl LogStream {
    pub fn new(store: Arc<dyn CoordinationStore>) -> Self {
        Self { store }
    }

    pub async fn log(&self, level: &str, msg: &str) {
        let entry = serde_json::json!({
            "ts": chrono::Utc::now().timestamp(),
            "level": level,
            "msg": msg,
        });
        self.store.push_head("producer_logs", &entry.to_string()).await;
        self.store.trim_head("producer_logs", PRODUCER_LOG_CAP).await;
    }

    pub async fn info(&self, msg: &str) {
        self.log("info", msg).await;
    }

    pub async fn warn(&self, msg: &str) {
        self.log("warn", msg).await;
    }

    pub async fn error(&self, msg: &str) {
        self.log("error", msg).await;
    }
}
