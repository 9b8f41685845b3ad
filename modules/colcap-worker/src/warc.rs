//! Minimal WARC (Web ARChive) record reader. No published crate in the
//! retrieved corpus reads this format, so this is net-new code grounded in
//! the subset of `warcio.ArchiveIterator` behavior the original worker
//! actually relies on: finding `response`-type records and their body.

use colcap_common::ColcapError;

const RECORD_MARKER: &[u8] = b"WARC/1.0";

#[derive(Debug, Clone)]
pub struct WarcRecord {
    pub rec_type: String,
    pub warc_date: Option<String>,
    pub body: Vec<u8>,
}

/// Scan `data` for WARC record boundaries and return every record found.
/// Truncated or malformed trailing records are dropped rather than erroring
/// the whole scan, mirroring the "skip that record only" parse policy.
pub fn parse_records(data: &[u8]) -> Vec<WarcRecord> {
    let mut records = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = find(&data[cursor..], RECORD_MARKER) {
        let start = cursor + offset;
        match parse_one(&data[start..]) {
            Some((record, consumed)) => {
                records.push(record);
                cursor = start + consumed;
            }
            None => break,
        }
    }

    records
}

/// Convenience: the first `response`-type record. No `response` record
/// found in a non-empty segment is a parse error, not a skip — the segment
/// was fetched fine, it just didn't decode into what we expected.
pub fn first_response(data: &[u8]) -> Result<WarcRecord, ColcapError> {
    parse_records(data)
        .into_iter()
        .find(|r| r.rec_type == "response")
        .ok_or_else(|| ColcapError::Parse("no response record in WARC segment".to_string()))
}

fn parse_one(data: &[u8]) -> Option<(WarcRecord, usize)> {
    let header_end = find(data, b"\r\n\r\n").or_else(|| find(data, b"\n\n"))?;
    let separator_len = if data[header_end..].starts_with(b"\r\n\r\n") {
        4
    } else {
        2
    };

    let header_text = std::str::from_utf8(&data[..header_end]).ok()?;
    let mut rec_type = String::new();
    let mut warc_date = None;
    let mut content_length: Option<usize> = None;

    for line in header_text.lines().skip(1) {
        let (key, value) = line.split_once(':')?;
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        match key.as_str() {
            "warc-type" => rec_type = value,
            "warc-date" => warc_date = Some(value),
            "content-length" => content_length = value.parse().ok(),
            _ => {}
        }
    }

    let body_start = header_end + separator_len;
    let length = content_length?;
    if body_start + length > data.len() {
        return None;
    }
    let body = data[body_start..body_start + length].to_vec();
    let consumed = body_start + length;

    Some((
        WarcRecord {
            rec_type,
            warc_date,
            body,
        },
        consumed,
    ))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(rec_type: &str, body: &str) -> Vec<u8> {
        format!(
            "WARC/1.0\r\nWARC-Type: {rec_type}\r\nWARC-Date: 2024-03-15T12:00:00Z\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
        .into_bytes()
    }

    #[test]
    fn parses_single_response_record() {
        let data = sample_record("response", "<html>hi</html>");
        let records = parse_records(&data);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rec_type, "response");
        assert_eq!(records[0].warc_date.as_deref(), Some("2024-03-15T12:00:00Z"));
        assert_eq!(records[0].body, b"<html>hi</html>");
    }

    #[test]
    fn finds_first_response_among_mixed_records() {
        let mut data = sample_record("warcinfo", "info-body");
        data.extend(sample_record("response", "<html>article</html>"));
        let record = first_response(&data).unwrap();
        assert_eq!(record.body, b"<html>article</html>");
    }

    #[test]
    fn truncated_trailing_record_is_dropped() {
        let mut data = sample_record("response", "<html>ok</html>");
        data.extend_from_slice(b"WARC/1.0\r\nWARC-Type: response\r\nContent-Length: 9999\r\n\r\nshort");
        let records = parse_records(&data);
        assert_eq!(records.len(), 1);
    }
}
