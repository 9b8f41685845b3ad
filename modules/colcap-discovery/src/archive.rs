use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use colcap_common::types::{ArchiveIndexRef, CdxRecord, Task};
use colcap_common::{ColcapError, Config};
use colcap_store::CoordinationStore;

use crate::heuristic::is_news_url;
use crate::UrlDiscoverer;

const COLLINFO_URL: &str = "https://index.commoncrawl.org/collinfo.json";
const CDX_BASE: &str = "https://index.commoncrawl.org";
const LOCAL_INDEX_CACHE: &str = "data/cc_indexes.csv";

/// Hardcoded fallback used only when both the live `collinfo.json` download
/// and the local cache are unavailable, so the producer can still start —
/// ported from `IndexManager`'s default list in the original source.
fn hardcoded_indices() -> Vec<ArchiveIndexRef> {
    vec![ArchiveIndexRef {
        id: "CC-MAIN-2024-10".to_string(),
        name: "CC-MAIN-2024-10".to_string(),
        cdx_api: format!("{CDX_BASE}/CC-MAIN-2024-10-index"),
    }]
}

/// Loads and caches the list of Common Crawl monthly indices, most recent
/// first, then walks `(index, domain)` pairs issuing CDX queries.
pub struct ArchiveIndexDiscoverer {
    http: reqwest::Client,
    store: Arc<dyn CoordinationStore>,
    indices: Vec<ArchiveIndexRef>,
    domains: Vec<String>,
    index_cursor: usize,
    domain_cursor: usize,
    delay_between_indexes: Duration,
}

impl ArchiveIndexDiscoverer {
    pub async fn bootstrap(
        http: reqwest::Client,
        store: Arc<dyn CoordinationStore>,
        config: &Config,
    ) -> colcap_common::Result<Self> {
        let indices = load_index_list(&http).await;
        if indices.is_empty() {
            return Err(colcap_common::ColcapError::Fatal(
                "no archive indices available; producer cannot start".to_string(),
            ));
        }

        let index_cursor = store
            .get("producer_position")
            .await
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0)
            % indices.len();

        Ok(Self {
            http,
            store,
            indices,
            domains: config.target_domains.clone(),
            index_cursor,
            domain_cursor: 0,
            delay_between_indexes: Duration::from_secs(config.delay_between_indexes_secs),
        })
    }

    fn current_index(&self) -> &ArchiveIndexRef {
        &self.indices[self.index_cursor % self.indices.len()]
    }

    /// Advance to the next `(index, domain)` pair, persisting the index
    /// position to the store so a restarted producer resumes roughly where
    /// it left off. On wraparound, pause (default 60s) before the next pass.
    async fn advance(&mut self) {
        self.domain_cursor += 1;
        if self.domain_cursor >= self.domains.len() {
            self.domain_cursor = 0;
            self.index_cursor += 1;
            if self.index_cursor >= self.indices.len() {
                self.index_cursor = 0;
                self.store.set("producer_position", "0").await;
                tracing::info!("index rotation wrapped around, pausing before next pass");
                tokio::time::sleep(Duration::from_secs(60)).await;
                return;
            }
            self.store
                .set("producer_position", &self.index_cursor.to_string())
                .await;
            tokio::time::sleep(self.delay_between_indexes).await;
        }
    }

    /// 404 means "this index has nothing for this domain" — a quiet empty
    /// result, not a failure. Any other non-2xx status or transport error
    /// is a real failure the caller should surface rather than swallow.
    async fn query_cdx(&self, index: &ArchiveIndexRef, domain: &str) -> Result<Vec<CdxRecord>, ColcapError> {
        let url = format!(
            "{}?url={domain}/*&output=json",
            index.cdx_api
        );
        let response = match self
            .http
            .get(&url)
            .timeout(Duration::from_secs(120))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%domain, index = %index.id, error = %e, "cdx query failed");
                return Err(ColcapError::Transport(e.to_string()));
            }
        };
        if response.status().as_u16() == 404 {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(%domain, index = %index.id, %status, "cdx query non-200");
            return Err(ColcapError::Protocol(format!("{status} querying cdx for {domain}")));
        }
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(%domain, error = %e, "cdx body read failed");
                return Err(ColcapError::Transport(e.to_string()));
            }
        };
        Ok(body
            .lines()
            .filter_map(|line| match serde_json::from_str::<CdxRecord>(line) {
                Ok(rec) => Some(rec),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed cdx record");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl UrlDiscoverer for ArchiveIndexDiscoverer {
    async fn next_batch(&mut self) -> Result<Vec<Task>, ColcapError> {
        let index = self.current_index().clone();
        let domain = self.domains[self.domain_cursor % self.domains.len().max(1)].clone();

        let records = match self.query_cdx(&index, &domain).await {
            Ok(records) => records,
            Err(e) => {
                self.advance().await;
                return Err(e);
            }
        };
        let mut enqueued = Vec::new();
        for rec in records {
            if !is_news_url(&rec.url) {
                continue;
            }
            if self.store.set_contains("processed_urls", &rec.url).await {
                continue;
            }
            self.store.set_add("processed_urls", &rec.url).await;
            let task = Task {
                url: rec.url,
                domain: domain.clone(),
                timestamp: rec.timestamp,
                archive_file: rec.filename,
                byte_offset: rec.offset.parse().unwrap_or(0),
                byte_length: rec.length.parse().unwrap_or(0),
            };
            self.store
                .push_head("warc_queue", &serde_json::to_string(&task).unwrap())
                .await;
            enqueued.push(task);
        }

        self.advance().await;
        Ok(enqueued)
    }

    fn name(&self) -> &'static str {
        "archive_index"
    }
}

async fn load_index_list(http: &reqwest::Client) -> Vec<ArchiveIndexRef> {
    match download_index_list(http).await {
        Ok(indices) => {
            if let Err(e) = cache_index_list(&indices) {
                tracing::warn!(error = %e, "failed to cache index list locally");
            }
            return indices;
        }
        Err(e) => {
            tracing::warn!(error = %e, "collinfo.json download failed, falling back to cache");
        }
    }

    match load_cached_index_list(Path::new(LOCAL_INDEX_CACHE)) {
        Ok(indices) if !indices.is_empty() => indices,
        _ => hardcoded_indices(),
    }
}

async fn download_index_list(http: &reqwest::Client) -> colcap_common::Result<Vec<ArchiveIndexRef>> {
    let response = http
        .get(COLLINFO_URL)
        .timeout(Duration::from_secs(60))
        .send()
        .await?;
    let body: Vec<serde_json::Value> = response.json().await?;
    let mut indices: Vec<ArchiveIndexRef> = body
        .into_iter()
        .filter_map(|v| {
            let id = v.get("id")?.as_str()?.to_string();
            if !id.starts_with("CC-MAIN-") {
                return None;
            }
            Some(ArchiveIndexRef {
                id: id.clone(),
                name: v.get("name")?.as_str()?.to_string(),
                cdx_api: v.get("cdx-api")?.as_str()?.to_string(),
            })
        })
        .collect();
    indices.sort_by(|a, b| b.id.cmp(&a.id));
    Ok(indices)
}

fn cache_index_list(indices: &[ArchiveIndexRef]) -> std::io::Result<()> {
    if let Some(parent) = Path::new(LOCAL_INDEX_CACHE).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(LOCAL_INDEX_CACHE)?;
    for idx in indices {
        writer
            .write_record([&idx.id, &idx.name, &idx.cdx_api])
            .map_err(std::io::Error::other)?;
    }
    writer.flush()
}

fn load_cached_index_list(path: &Path) -> colcap_common::Result<Vec<ArchiveIndexRef>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| colcap_common::ColcapError::Data(e.to_string()))?;
    let mut indices = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| colcap_common::ColcapError::Data(e.to_string()))?;
        if record.len() < 3 {
            continue;
        }
        indices.push(ArchiveIndexRef {
            id: record[0].to_string(),
            name: record[1].to_string(),
            cdx_api: record[2].to_string(),
        });
    }
    Ok(indices)
}
