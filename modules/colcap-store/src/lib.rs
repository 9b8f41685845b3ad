mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

/// The single injected collaborator the rest of the pipeline talks to. All
/// "global" coordination lives behind this trait; per spec, op failures are
/// caught and logged by the implementation and surfaced here as neutral
/// values (empty, zero, `None`) — never as an `Err`. Only `connect` can fail.
#[async_trait]
pub trait CoordinationStore: Send + Sync {
    async fn push_head(&self, list: &str, value: &str);
    async fn pop_head(&self, list: &str) -> Option<String>;
    async fn pop_head_blocking(&self, list: &str, timeout: Duration) -> Option<String>;
    async fn len(&self, list: &str) -> u64;

    /// Keep only the `max_len` most-recently-pushed entries (the items
    /// closest to the head), dropping the tail. Used to enforce every
    /// bounded FIFO list's cap (`producer_logs`, `throughput_history`,
    /// `resultados_dashboard`, `correlaciones_history`, `metrics_history`).
    async fn trim_head(&self, list: &str, max_len: usize);

    /// Non-destructive read of up to `limit` entries, head-first (most
    /// recently pushed first). Used by the monitoring view to read history
    /// lists without consuming them.
    async fn peek_head(&self, list: &str, limit: usize) -> Vec<String>;

    async fn set_add(&self, set: &str, member: &str) -> bool;
    async fn set_contains(&self, set: &str, member: &str) -> bool;
    async fn set_size(&self, set: &str) -> u64;

    async fn hash_set(&self, key: &str, field: &str, value: &str);
    async fn hash_get_all(&self, key: &str) -> HashMap<String, String>;
    async fn expire(&self, key: &str, seconds: i64);

    async fn incr(&self, key: &str) -> i64;
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str);

    /// Enumerate keys matching a wildcard `prefix*` pattern.
    async fn scan_keys(&self, pattern: &str) -> Vec<String>;
}
