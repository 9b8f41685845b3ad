use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use colcap_common::{ColcapError, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::CoordinationStore;

/// Redis-backed coordination store. Wraps `ConnectionManager`, which
/// reconnects transparently on a dropped connection, so only the initial
/// `connect` needs explicit retry.
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect with bounded retry: `attempts` tries, `backoff` between them.
    pub async fn connect(url: &str, attempts: u32, backoff: Duration) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| ColcapError::Fatal(format!("invalid redis url: {e}")))?;

        let mut last_err = None;
        for attempt in 1..=attempts.max(1) {
            match client.get_connection_manager().await {
                Ok(manager) => return Ok(Self { manager }),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "redis connect attempt failed");
                    last_err = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }
        Err(ColcapError::Coordination(format!(
            "could not connect to redis after {attempts} attempts: {}",
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }
}

#[async_trait]
impl CoordinationStore for RedisStore {
    async fn push_head(&self, list: &str, value: &str) {
        let mut conn = self.manager.clone();
        if let Err(e) = conn.lpush::<_, _, ()>(list, value).await {
            tracing::warn!(list, error = %e, "push_head failed");
        }
    }

    async fn pop_head(&self, list: &str) -> Option<String> {
        let mut conn = self.manager.clone();
        match conn.lpop::<_, Option<String>>(list, None).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(list, error = %e, "pop_head failed");
                None
            }
        }
    }

    async fn pop_head_blocking(&self, list: &str, timeout: Duration) -> Option<String> {
        let mut conn = self.manager.clone();
        let result: redis::RedisResult<Option<(String, String)>> =
            conn.blpop(list, timeout.as_secs_f64()).await;
        match result {
            Ok(Some((_, value))) => Some(value),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(list, error = %e, "pop_head_blocking failed");
                None
            }
        }
    }

    async fn len(&self, list: &str) -> u64 {
        let mut conn = self.manager.clone();
        match conn.llen::<_, u64>(list).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(list, error = %e, "len failed");
                0
            }
        }
    }

    async fn trim_head(&self, list: &str, max_len: usize) {
        let mut conn = self.manager.clone();
        let end = max_len.saturating_sub(1) as isize;
        if let Err(e) = conn.ltrim::<_, ()>(list, 0, end).await {
            tracing::warn!(list, max_len, error = %e, "trim_head failed");
        }
    }

    async fn peek_head(&self, list: &str, limit: usize) -> Vec<String> {
        let mut conn = self.manager.clone();
        let end = (limit.saturating_sub(1)) as isize;
        match conn.lrange::<_, Vec<String>>(list, 0, end).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(list, error = %e, "peek_head failed");
                Vec::new()
            }
        }
    }

    async fn set_add(&self, set: &str, member: &str) -> bool {
        let mut conn = self.manager.clone();
        match conn.sadd::<_, _, u64>(set, member).await {
            Ok(n) => n > 0,
            Err(e) => {
                tracing::warn!(set, error = %e, "set_add failed");
                false
            }
        }
    }

    async fn set_contains(&self, set: &str, member: &str) -> bool {
        let mut conn = self.manager.clone();
        match conn.sismember::<_, _, bool>(set, member).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(set, error = %e, "set_contains failed");
                false
            }
        }
    }

    async fn set_size(&self, set: &str) -> u64 {
        let mut conn = self.manager.clone();
        match conn.scard::<_, u64>(set).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(set, error = %e, "set_size failed");
                0
            }
        }
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) {
        let mut conn = self.manager.clone();
        if let Err(e) = conn.hset::<_, _, _, ()>(key, field, value).await {
            tracing::warn!(key, field, error = %e, "hash_set failed");
        }
    }

    async fn hash_get_all(&self, key: &str) -> HashMap<String, String> {
        let mut conn = self.manager.clone();
        match conn.hgetall::<_, HashMap<String, String>>(key).await {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(key, error = %e, "hash_get_all failed");
                HashMap::new()
            }
        }
    }

    async fn expire(&self, key: &str, seconds: i64) {
        let mut conn = self.manager.clone();
        if let Err(e) = conn.expire::<_, ()>(key, seconds).await {
            tracing::warn!(key, seconds, error = %e, "expire failed");
        }
    }

    async fn incr(&self, key: &str) -> i64 {
        let mut conn = self.manager.clone();
        match conn.incr::<_, _, i64>(key, 1).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(key, error = %e, "incr failed");
                0
            }
        }
    }

    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.manager.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "get failed");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str) {
        let mut conn = self.manager.clone();
        if let Err(e) = conn.set::<_, _, ()>(key, value).await {
            tracing::warn!(key, error = %e, "set failed");
        }
    }

    async fn scan_keys(&self, pattern: &str) -> Vec<String> {
        let mut conn = self.manager.clone();
        let mut keys = Vec::new();
        let mut iter = match conn.scan_match::<_, String>(pattern).await {
            Ok(iter) => iter,
            Err(e) => {
                tracing::warn!(pattern, error = %e, "scan_keys failed");
                return keys;
            }
        };
        use futures::StreamExt;
        while let Some(key) = iter.next().await {
            keys.push(key);
        }
        keys
    }
}
