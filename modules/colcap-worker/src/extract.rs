use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

const CONTENT_SELECTORS: &[&str] = &[
    "article",
    ".article-content",
    ".article-body",
    ".entry-content",
    ".post-content",
    ".news-content",
    ".contenido",
    "[itemprop=articleBody]",
];

/// Tags whose text never belongs in an article body. `scraper`'s parsed
/// tree has no in-place node removal, so instead of a `tag.decompose()`
/// pass (`original_source/src/worker/processor.py:95-98`) every `<p>`
/// candidate is checked against this list via its ancestor chain before
/// its text is collected.
const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "iframe", "noscript", "form",
];

const MAX_EXCERPT_LEN: usize = 2000;
const MIN_ACCEPTED_LEN: usize = 100;

pub struct Extracted {
    pub title: String,
    pub text: String,
}

/// Extract title and cleaned article body text from raw HTML, following the
/// same selector cascade and cleanup rules `rootsignal-domains`'s link
/// extractor uses for href extraction, applied here to article content.
/// Returns `None` if the cleaned text is shorter than the accepted minimum.
pub fn extract(html: &str) -> Option<Extracted> {
    let document = Html::parse_document(html);
    let title = extract_title(&document);
    let raw_text = extract_body_text(&document);
    let cleaned = clean_text(&raw_text);

    if cleaned.chars().count() < MIN_ACCEPTED_LEN {
        return None;
    }

    Some(Extracted {
        title,
        text: cleaned,
    })
}

fn extract_title(document: &Html) -> String {
    if let Ok(selector) = Selector::parse(r#"meta[property="og:title"]"#) {
        if let Some(el) = document.select(&selector).next() {
            if let Some(content) = el.value().attr("content") {
                if !content.trim().is_empty() {
                    return content.trim().to_string();
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("h1") {
        if let Some(el) = document.select(&selector).next() {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return text;
            }
        }
    }

    if let Ok(selector) = Selector::parse("title") {
        if let Some(el) = document.select(&selector).next() {
            let text = el.text().collect::<String>();
            if let Some(first_segment) = text.split('|').next() {
                return first_segment.trim().to_string();
            }
        }
    }

    String::new()
}

fn extract_body_text(document: &Html) -> String {
    let p_selector = Selector::parse("p").expect("static selector");

    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(container) = document.select(&selector).next() {
                let text: String = container
                    .select(&p_selector)
                    .filter(|p| !is_inside_stripped_tag(p))
                    .map(|p| p.text().collect::<String>())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !text.trim().is_empty() {
                    return text;
                }
            }
        }
    }

    // Fallback: up to 20 top-level <p> elements in the whole document.
    document
        .select(&p_selector)
        .filter(|p| !is_inside_stripped_tag(p))
        .take(20)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// True if `el` (or any of its ancestors) is one of `STRIPPED_TAGS`.
fn is_inside_stripped_tag(el: &scraper::ElementRef) -> bool {
    el.ancestors()
        .filter_map(scraper::ElementRef::wrap)
        .any(|ancestor| STRIPPED_TAGS.contains(&ancestor.value().name()))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Normalize whitespace, drop characters outside the Spanish-letter +
/// punctuation class, and truncate to the excerpt cap.
fn clean_text(raw: &str) -> String {
    let collapsed = whitespace_re().replace_all(raw.trim(), " ");
    let filtered: String = collapsed.chars().filter(|c| is_allowed_char(*c)).collect();
    filtered.chars().take(MAX_EXCERPT_LEN).collect()
}

fn is_allowed_char(c: char) -> bool {
    c.is_alphanumeric()
        || c.is_whitespace()
        || matches!(
            c,
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | '-' | '(' | ')' | '%' | '$'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_from_og_meta_first() {
        let html = r#"<html><head>
            <meta property="og:title" content="Dólar al alza hoy" />
            <title>Otro título | El Tiempo</title>
        </head><body><h1>Encabezado</h1></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_title(&document), "Dólar al alza hoy");
    }

    #[test]
    fn falls_back_to_h1_then_title_segment() {
        let html = r#"<html><head><title>Segmento uno | El Tiempo</title></head>
            <body><h1>Encabezado principal</h1></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_title(&document), "Encabezado principal");

        let html_no_h1 = r#"<html><head><title>Segmento uno | El Tiempo</title></head>
            <body></body></html>"#;
        let document = Html::parse_document(html_no_h1);
        assert_eq!(extract_title(&document), "Segmento uno");
    }

    #[test]
    fn rejects_short_article_body() {
        let html = "<html><body><article><p>muy corto</p></article></body></html>";
        assert!(extract(html).is_none());
    }

    #[test]
    fn accepts_long_enough_article_body() {
        let paragraph = "La economía colombiana muestra señales de recuperación este trimestre con un repunte en las exportaciones y la inversión extranjera directa, según reportes recientes del Banco de la República. ".repeat(2);
        let html = format!(
            "<html><body><article><p>{paragraph}</p></article></body></html>"
        );
        let extracted = extract(&html).unwrap();
        assert!(extracted.text.chars().count() >= MIN_ACCEPTED_LEN);
    }

    #[test]
    fn strips_nav_and_footer_text_from_the_fallback_path() {
        let html = "<html><body>\
            <nav><p>Inicio Economia Deportes Opinion Contacto</p></nav>\
            <p>La economía colombiana muestra señales de recuperación este trimestre.</p>\
            <footer><p>Todos los derechos reservados 2024</p></footer>\
            </body></html>";
        let text = extract_body_text(&Html::parse_document(html));
        assert!(!text.contains("Inicio Economia"));
        assert!(!text.contains("derechos reservados"));
        assert!(text.contains("recuperación"));
    }
}
