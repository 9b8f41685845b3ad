use colcap_common::lexicon::{EXCLUDED_PATTERNS, NEWS_SECTIONS};

/// True iff `url` survives the block-list and carries one of the two
/// positive signals: a known news-section prefix, or a trailing numeric
/// article id in the last path segment.
pub fn is_news_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    if EXCLUDED_PATTERNS.iter().any(|p| lower.contains(p)) {
        return false;
    }
    if NEWS_SECTIONS.iter().any(|s| lower.contains(s)) {
        return true;
    }
    last_segment_has_digit(&lower)
}

fn last_segment_has_digit(url: &str) -> bool {
    let path = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url)
        .splitn(2, '/')
        .nth(1)
        .unwrap_or("");
    let last = path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("");
    last.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_section_with_trailing_id() {
        assert!(is_news_url(
            "https://www.eltiempo.com/economia/nota-12345"
        ));
    }

    #[test]
    fn rejects_robots_txt() {
        assert!(!is_news_url("https://www.eltiempo.com/robots.txt"));
    }

    #[test]
    fn rejects_tag_listing() {
        assert!(!is_news_url("https://www.eltiempo.com/tag/dolar"));
    }

    #[test]
    fn rejects_search_query() {
        assert!(!is_news_url("https://www.eltiempo.com/search?q=dolar"));
    }

    #[test]
    fn accepts_trailing_digit_outside_known_section() {
        assert!(is_news_url(
            "https://www.larepublica.co/alguna-seccion/nota-987"
        ));
    }

    #[test]
    fn rejects_section_without_excluded_but_no_digit_or_section() {
        assert!(!is_news_url("https://www.eltiempo.com/clima/pronostico"));
    }

    #[test]
    fn accepts_opinion_section_as_a_positive_signal() {
        assert!(is_news_url(
            "https://www.eltiempo.com/opinion/columnistas/mi-columna"
        ));
    }
}
