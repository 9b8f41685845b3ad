pub mod run;
pub mod scalability;
pub mod snapshot;

pub use run::run;
pub use scalability::derive as derive_scalability;
pub use snapshot::record_throughput_snapshot;
