pub mod config;
pub mod error;
pub mod historical;
pub mod lexicon;
pub mod types;

pub use config::Config;
pub use error::{ColcapError, Result};
pub use historical::HistoricalTable;
