/// Result type alias for colcap operations.
pub type Result<T> = std::result::Result<T, ColcapError>;

/// Error taxonomy for the pipeline. Kinds, not types: each variant groups a
/// class of failure that the caller needs to branch on, not every distinct
/// upstream error type.
#[derive(Debug, thiserror::Error)]
pub enum ColcapError {
    /// HTTP/network failure reaching an archive, CDX, or portal endpoint.
    #[error("transport error: {0}")]
    Transport(String),

    /// A non-2xx response or a malformed response body where a well-formed
    /// one was expected.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A record in a stream (CDX line, WARC record, CSV row) could not be
    /// parsed; the caller should skip just that record.
    #[error("parse error: {0}")]
    Parse(String),

    /// The coordination store is unreachable.
    #[error("coordination store unavailable: {0}")]
    Coordination(String),

    /// Required data is missing or empty (no historical index file, no
    /// archive indices loaded).
    #[error("data error: {0}")]
    Data(String),

    /// Unrecoverable startup condition; the process should exit non-zero.
    #[error("fatal: {0}")]
    Fatal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for ColcapError {
    fn from(e: reqwest::Error) -> Self {
        ColcapError::Transport(e.to_string())
    }
}

impl From<redis::RedisError> for ColcapError {
    fn from(e: redis::RedisError) -> Self {
        ColcapError::Coordination(e.to_string())
    }
}

impl From<csv::Error> for ColcapError {
    fn from(e: csv::Error) -> Self {
        ColcapError::Data(e.to_string())
    }
}
