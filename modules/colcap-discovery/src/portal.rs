use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use colcap_common::types::Task;
use colcap_common::{ColcapError, Config};
use colcap_store::CoordinationStore;
use scraper::{Html, Selector};

use crate::heuristic::is_news_url;
use crate::portals::{portals_for, PortalConfig};
use crate::UrlDiscoverer;

const PAGE_PAUSE: Duration = Duration::from_secs(3);

/// Direct HTML scraping of portal section listing pages, used once the
/// archive-index strategy has gone cold three scans in a row.
pub struct PortalScrapeDiscoverer {
    http: reqwest::Client,
    store: Arc<dyn CoordinationStore>,
    portals: Vec<PortalConfig>,
    portal_cursor: usize,
}

impl PortalScrapeDiscoverer {
    pub fn new(http: reqwest::Client, store: Arc<dyn CoordinationStore>, config: &Config) -> Self {
        Self {
            http,
            store,
            portals: portals_for(&config.target_domains),
            portal_cursor: 0,
        }
    }

    /// Paginate one section, enqueuing every new (not-yet-in-`processed_urls`)
    /// article as it's found. Stops cleanly (`Ok`) on a non-200 response, an
    /// empty page, or a page whose hrefs are entirely already in
    /// `processed_urls` — the `page_new == 0` stop condition from
    /// `NewsPortalIndexer.index_portal` (`original_source/src/producer/news_indexer.py:146-173`),
    /// checked against the store's global set rather than this call's own
    /// accumulator so a fully-reprocessed section stops on page 1 instead of
    /// repaginating through `max_pages` every cycle. A transport failure
    /// reaching the portal at all returns `Err` instead, unlike the
    /// original's blanket `except Exception: break` in the same loop, so
    /// `colcap-producer::run` can distinguish "section exhausted" from
    /// "portal unreachable" for its error-backoff branch.
    async fn scrape_section(&self, portal: &PortalConfig, section: &str) -> Result<Vec<Task>, ColcapError> {
        let link_selector = Selector::parse("a[href]").expect("static selector");
        let mut enqueued = Vec::new();

        for page in 1..=portal.max_pages {
            let url = portal.paginated_url(section, page);
            let response = match self
                .http
                .get(&url)
                .timeout(Duration::from_secs(30))
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(%url, error = %e, "portal fetch failed");
                    return Err(ColcapError::Transport(e.to_string()));
                }
            };
            if !response.status().is_success() {
                break;
            }
            let body = match response.text().await {
                Ok(b) => b,
                Err(e) => return Err(ColcapError::Transport(e.to_string())),
            };

            let page_hrefs: Vec<String> = {
                let document = Html::parse_document(&body);
                document
                    .select(&link_selector)
                    .filter_map(|el| el.value().attr("href"))
                    .map(|href| absolutize(portal.domain, href))
                    .filter(|href| is_news_url(href))
                    .collect()
            };

            if page_hrefs.is_empty() {
                break;
            }

            let mut page_new = 0u32;
            for href in page_hrefs {
                if self.store.set_contains("processed_urls", &href).await {
                    continue;
                }
                self.store.set_add("processed_urls", &href).await;
                let task = Task {
                    url: href,
                    domain: portal.domain.to_string(),
                    timestamp: chrono::Utc::now().format("%Y%m%d%H%M%S").to_string(),
                    archive_file: String::new(),
                    byte_offset: 0,
                    byte_length: 0,
                };
                self.store
                    .push_head("warc_queue", &serde_json::to_string(&task).unwrap())
                    .await;
                enqueued.push(task);
                page_new += 1;
            }

            if page_new == 0 {
                break;
            }
            if page < portal.max_pages {
                tokio::time::sleep(PAGE_PAUSE).await;
            }
        }

        Ok(enqueued)
    }
}

fn absolutize(domain: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if let Some(stripped) = href.strip_prefix('/') {
        format!("https://www.{domain}/{stripped}")
    } else {
        format!("https://www.{domain}/{href}")
    }
}

#[async_trait]
impl UrlDiscoverer for PortalScrapeDiscoverer {
    /// Scans every section of the current portal and advances to the next
    /// one regardless of outcome. If any section failed to fetch at all,
    /// returns `Err` with whatever was enqueued from the other sections
    /// already pushed to the store — the caller logs the failure and backs
    /// off, but nothing already enqueued is lost.
    async fn next_batch(&mut self) -> Result<Vec<Task>, ColcapError> {
        if self.portals.is_empty() {
            return Ok(Vec::new());
        }
        let portal_idx = self.portal_cursor % self.portals.len();
        let portal = &self.portals[portal_idx];
        let mut enqueued = Vec::new();
        let mut first_error = None;

        for section in portal.sections {
            match self.scrape_section(portal, section).await {
                Ok(tasks) => enqueued.extend(tasks),
                Err(e) => {
                    tracing::warn!(domain = portal.domain, section, error = %e, "portal section scrape failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        self.portal_cursor = (self.portal_cursor + 1) % self.portals.len();
        match first_error {
            Some(e) => Err(e),
            None => Ok(enqueued),
        }
    }

    fn name(&self) -> &'static str {
        "portal"
    }
}
