use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::CoordinationStore;

#[derive(Default)]
struct State {
    lists: HashMap<String, VecDeque<String>>,
    sets: HashMap<String, HashSet<String>>,
    hashes: HashMap<String, HashMap<String, String>>,
    strings: HashMap<String, String>,
    expirations: HashMap<String, Instant>,
}

/// In-process fake `CoordinationStore` used by tests across every crate in
/// the workspace: no network, no external Redis instance required.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_expired(state: &State, key: &str) -> bool {
        state
            .expirations
            .get(key)
            .map(|deadline| Instant::now() >= *deadline)
            .unwrap_or(false)
    }
}

#[async_trait]
impl CoordinationStore for MemoryStore {
    async fn push_head(&self, list: &str, value: &str) {
        let mut state = self.state.lock().await;
        state
            .lists
            .entry(list.to_string())
            .or_default()
            .push_front(value.to_string());
    }

    async fn pop_head(&self, list: &str) -> Option<String> {
        let mut state = self.state.lock().await;
        state.lists.get_mut(list).and_then(|l| l.pop_front())
    }

    async fn pop_head_blocking(&self, list: &str, timeout: Duration) -> Option<String> {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(v) = state.lists.get_mut(list).and_then(|l| l.pop_front()) {
                    return Some(v);
                }
            }
            if Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    async fn len(&self, list: &str) -> u64 {
        let state = self.state.lock().await;
        state.lists.get(list).map(|l| l.len() as u64).unwrap_or(0)
    }

    async fn trim_head(&self, list: &str, max_len: usize) {
        let mut state = self.state.lock().await;
        if let Some(l) = state.lists.get_mut(list) {
            l.truncate(max_len);
        }
    }

    async fn peek_head(&self, list: &str, limit: usize) -> Vec<String> {
        let state = self.state.lock().await;
        state
            .lists
            .get(list)
            .map(|l| l.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    async fn set_add(&self, set: &str, member: &str) -> bool {
        let mut state = self.state.lock().await;
        state
            .sets
            .entry(set.to_string())
            .or_default()
            .insert(member.to_string())
    }

    async fn set_contains(&self, set: &str, member: &str) -> bool {
        let state = self.state.lock().await;
        state
            .sets
            .get(set)
            .map(|s| s.contains(member))
            .unwrap_or(false)
    }

    async fn set_size(&self, set: &str) -> u64 {
        let state = self.state.lock().await;
        state.sets.get(set).map(|s| s.len() as u64).unwrap_or(0)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) {
        let mut state = self.state.lock().await;
        state
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    async fn hash_get_all(&self, key: &str) -> HashMap<String, String> {
        let mut state = self.state.lock().await;
        if Self::is_expired(&state, key) {
            state.hashes.remove(key);
            state.expirations.remove(key);
            return HashMap::new();
        }
        state.hashes.get(key).cloned().unwrap_or_default()
    }

    async fn expire(&self, key: &str, seconds: i64) {
        let mut state = self.state.lock().await;
        let deadline = Instant::now() + Duration::from_secs(seconds.max(0) as u64);
        state.expirations.insert(key.to_string(), deadline);
    }

    async fn incr(&self, key: &str) -> i64 {
        let mut state = self.state.lock().await;
        let entry = state.strings.entry(key.to_string()).or_insert_with(|| "0".to_string());
        let next = entry.parse::<i64>().unwrap_or(0) + 1;
        *entry = next.to_string();
        next
    }

    async fn get(&self, key: &str) -> Option<String> {
        let state = self.state.lock().await;
        state.strings.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) {
        let mut state = self.state.lock().await;
        state.strings.insert(key.to_string(), value.to_string());
    }

    async fn scan_keys(&self, pattern: &str) -> Vec<String> {
        let prefix = pattern.trim_end_matches('*');
        let state = self.state.lock().await;
        state
            .lists
            .keys()
            .chain(state.sets.keys())
            .chain(state.hashes.keys())
            .chain(state.strings.keys())
            .filter(|k| k.starts_with(prefix) && !Self::is_expired(&state, k))
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect()
    }
}
