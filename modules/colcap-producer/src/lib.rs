pub mod backpressure;
pub mod log_stream;
pub mod run;

pub use log_stream::LogStream;
pub use run::run;
