use std::io::Read;
use std::time::Duration;

use colcap_common::ColcapError;
use flate2::read::GzDecoder;

const ARCHIVE_BASE: &str = "https://data.commoncrawl.org";
const POLITENESS_DELAY: Duration = Duration::from_secs(5);
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const RETRY_ATTEMPTS: u32 = 2;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

pub fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .build()
        .expect("reqwest client config is static and valid")
}

/// Byte-range GET for one archive segment, preceded by the fixed politeness
/// delay and retried on 5xx only. A non-retryable status or a transport
/// failure surviving all retries is a real error, not a skip — the caller
/// counts it against `total_errors`.
pub async fn fetch_segment(
    client: &reqwest::Client,
    archive_file: &str,
    offset: u64,
    length: u64,
) -> Result<Vec<u8>, ColcapError> {
    tokio::time::sleep(POLITENESS_DELAY).await;

    let url = format!("{ARCHIVE_BASE}/{archive_file}");
    let range = format!("bytes={offset}-{}", offset + length.saturating_sub(1));

    let mut attempt = 0;
    loop {
        let result = client
            .get(&url)
            .header("Range", &range)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() || resp.status().as_u16() == 206 => {
                return resp
                    .bytes()
                    .await
                    .map(|b| b.to_vec())
                    .map_err(|e| ColcapError::Transport(e.to_string()));
            }
            Ok(resp) if resp.status().is_server_error() && attempt < RETRY_ATTEMPTS => {
                attempt += 1;
                tokio::time::sleep(RETRY_BASE_DELAY * 2u32.pow(attempt - 1)).await;
            }
            Ok(resp) => {
                let status = resp.status();
                tracing::warn!(%url, %status, "archive fetch non-retryable error");
                return Err(ColcapError::Protocol(format!("{status} fetching {url}")));
            }
            Err(e) if attempt < RETRY_ATTEMPTS => {
                attempt += 1;
                tracing::warn!(%url, attempt, error = %e, "archive fetch transport error, retrying");
                tokio::time::sleep(RETRY_BASE_DELAY * 2u32.pow(attempt - 1)).await;
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "archive fetch failed after retries");
                return Err(ColcapError::Transport(e.to_string()));
            }
        }
    }
}

/// Gzip-decompress; on decode failure, pass the bytes through unchanged.
/// The raw-bytes path is unreachable for real Common Crawl data but kept
/// for robustness per the open question in SPEC_FULL.md.
pub fn decompress(bytes: &[u8]) -> Vec<u8> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    match decoder.read_to_end(&mut out) {
        Ok(_) => out,
        Err(_) => bytes.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn decompresses_valid_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hello world").unwrap();
        let compressed = encoder.finish().unwrap();
        assert_eq!(decompress(&compressed), b"hello world");
    }

    #[test]
    fn falls_back_to_raw_bytes_on_non_gzip_input() {
        let raw = b"not gzip data".to_vec();
        assert_eq!(decompress(&raw), raw);
    }
}
