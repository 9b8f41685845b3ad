pub mod correlate;
pub mod engine;
pub mod extract;
pub mod fetch;
pub mod nlp;
pub mod pipeline;
pub mod run;
pub mod telemetry;
pub mod warc;

pub use correlate::Correlator;
pub use engine::BatchEngine;
pub use nlp::{KeywordLexiconAnalyzer, SentimentAnalyzer};
pub use run::run;
