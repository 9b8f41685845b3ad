pub mod archive;
pub mod heuristic;
pub mod orchestrator;
pub mod portal;
pub mod portals;

pub use archive::ArchiveIndexDiscoverer;
pub use orchestrator::FallbackOrchestrator;
pub use portal::PortalScrapeDiscoverer;

use async_trait::async_trait;
use colcap_common::types::Task;
use colcap_common::ColcapError;

/// A lazy source of candidate article URLs. `next_batch` returns whatever
/// it could produce in one scan step; an empty `Ok` batch is a normal
/// outcome (nothing new this round). `Err` surfaces a transport/protocol/
/// parse failure so `colcap-producer::run` can tell a quiet scan apart from
/// a real failure and back off accordingly, per spec.md §4.2's "non-fatal
/// exception → log + sleep 30s before retrying" — each implementation still
/// logs the underlying failure itself before returning it.
#[async_trait]
pub trait UrlDiscoverer: Send + Sync {
    async fn next_batch(&mut self) -> Result<Vec<Task>, ColcapError>;

    /// Human-readable name for logging (e.g. "archive_index", "portal").
    fn name(&self) -> &'static str;
}
