use std::sync::Arc;
use std::time::Instant;

use colcap_common::types::{ResultRecord, Task, Timings};
use colcap_common::ColcapError;
use colcap_store::CoordinationStore;

use crate::correlate::Correlator;
use crate::nlp::SentimentAnalyzer;
use crate::{extract, fetch, warc};

/// Result of running one task through the pipeline. `Error` carries a real
/// transport/protocol/parse failure (counted against `total_errors`);
/// `Skipped` is a deliberate non-match on content grounds — too-short text,
/// no correlator index value for the assigned date — which
/// spec.md §4.5 counts against `total_skipped` instead.
pub enum TaskOutcome {
    Processed(ResultRecord),
    Skipped,
    Error(ColcapError),
}

/// Runs the full fetch → decompress → WARC scan → correlate → extract →
/// analyze pipeline for one task.
pub async fn process_task(
    client: &reqwest::Client,
    store: &Arc<dyn CoordinationStore>,
    correlator: &Correlator,
    analyzer: &dyn SentimentAnalyzer,
    worker_id: &str,
    task: &Task,
) -> TaskOutcome {
    let started = Instant::now();

    let fetch_started = Instant::now();
    let raw = if task.has_archive_location() {
        match fetch::fetch_segment(client, &task.archive_file, task.byte_offset, task.byte_length).await {
            Ok(bytes) => bytes,
            Err(e) => return TaskOutcome::Error(e),
        }
    } else {
        match fetch_direct(client, &task.url).await {
            Ok(bytes) => bytes,
            Err(e) => return TaskOutcome::Error(e),
        }
    };
    let fetch_ms = fetch_started.elapsed().as_millis() as u64;

    let decompressed = fetch::decompress(&raw);

    let (html, record_date, source) = if task.has_archive_location() {
        let record = match warc::first_response(&decompressed) {
            Ok(r) => r,
            Err(e) => return TaskOutcome::Error(e),
        };
        let html = String::from_utf8_lossy(&record.body).into_owned();
        let date = record.warc_date.unwrap_or_else(|| task.timestamp.clone());
        (html, date, "common_crawl".to_string())
    } else {
        let html = String::from_utf8_lossy(&decompressed).into_owned();
        (html, task.timestamp.clone(), "portal_scrape".to_string())
    };

    let Some((assigned_date, index_value)) = correlator.correlate(store, &record_date).await else {
        return TaskOutcome::Skipped;
    };

    let extract_started = Instant::now();
    let Some(extracted) = extract::extract(&html) else {
        return TaskOutcome::Skipped;
    };
    let extract_ms = extract_started.elapsed().as_millis() as u64;

    let analyze_started = Instant::now();
    let sentiment = analyzer.analyze(&extracted.text).await;
    let analyze_ms = analyze_started.elapsed().as_millis() as u64;

    let total_ms = started.elapsed().as_millis() as u64;

    let mut record = ResultRecord {
        url: task.url.clone(),
        title: extracted.title,
        domain: task.domain.clone(),
        date: assigned_date,
        index_value,
        sentiment: sentiment.classification,
        keywords: sentiment.keywords,
        text_excerpt: extracted.text,
        text_length: 0,
        source,
        timings: Timings {
            fetch_ms,
            extract_ms,
            analyze_ms,
            total_ms,
        },
        worker_id: worker_id.to_string(),
        processed_at: chrono::Utc::now().timestamp(),
    };
    record.text_length = record.text_excerpt.chars().count();

    TaskOutcome::Processed(record)
}

async fn fetch_direct(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, ColcapError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ColcapError::Protocol(format!("{} fetching {url}", response.status())));
    }
    Ok(response.bytes().await?.to_vec())
}
