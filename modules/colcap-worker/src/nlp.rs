use async_trait::async_trait;
use colcap_common::lexicon::{NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS};
use colcap_common::types::{SentimentClass, SentimentResult};

/// The NLP scoring model itself is explicitly out of scope (spec.md §6);
/// this trait is the seam a real transformer-based scorer would plug into.
/// The shipped implementation is the keyword tally that *is* in scope.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> SentimentResult;
}

/// Deterministic Spanish economic-keyword lexicon scorer. Redesigned from
/// (not a port of) `detect_economic_keywords`/`pysentimiento` in the
/// original worker's NLP module — see `colcap_common::lexicon`'s doc
/// comment — while preserving the result shape callers observe from a
/// real model.
pub struct KeywordLexiconAnalyzer;

#[async_trait]
impl SentimentAnalyzer for KeywordLexiconAnalyzer {
    async fn analyze(&self, text: &str) -> SentimentResult {
        let lower = text.to_lowercase();

        let matched_positive: Vec<&str> = POSITIVE_KEYWORDS
            .iter()
            .filter(|k| lower.contains(*k))
            .copied()
            .collect();
        let matched_negative: Vec<&str> = NEGATIVE_KEYWORDS
            .iter()
            .filter(|k| lower.contains(*k))
            .copied()
            .collect();

        let pos = matched_positive.len() as f64;
        let neg = matched_negative.len() as f64;
        let total = pos + neg;

        let polarity = if total > 0.0 { (pos - neg) / total } else { 0.0 };
        let subjectivity = (total / 10.0).min(1.0);
        let confidence = if total > 0.0 {
            (total / (total + 3.0)).min(1.0)
        } else {
            0.0
        };

        let classification = if polarity > 0.15 {
            SentimentClass::Positivo
        } else if polarity < -0.15 {
            SentimentClass::Negativo
        } else {
            SentimentClass::Neutral
        };

        let mut keywords: Vec<String> = matched_positive
            .into_iter()
            .chain(matched_negative)
            .map(str::to_string)
            .collect();
        keywords.sort();
        keywords.dedup();

        SentimentResult {
            polarity,
            subjectivity,
            classification,
            confidence,
            keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn positive_keywords_drive_positive_classification() {
        let analyzer = KeywordLexiconAnalyzer;
        let result = analyzer
            .analyze("La bolsa reporta un fuerte crecimiento y recuperación en el sector")
            .await;
        assert_eq!(result.classification, SentimentClass::Positivo);
        assert!(result.polarity > 0.0);
        assert!(!result.keywords.is_empty());
    }

    #[tokio::test]
    async fn negative_keywords_drive_negative_classification() {
        let analyzer = KeywordLexiconAnalyzer;
        let result = analyzer
            .analyze("El mercado enfrenta una grave crisis y caída de pérdidas")
            .await;
        assert_eq!(result.classification, SentimentClass::Negativo);
        assert!(result.polarity < 0.0);
    }

    #[tokio::test]
    async fn no_keywords_is_neutral_with_zero_confidence() {
        let analyzer = KeywordLexiconAnalyzer;
        let result = analyzer
            .analyze("El clima en Bogotá estuvo nublado toda la tarde")
            .await;
        assert_eq!(result.classification, SentimentClass::Neutral);
        assert_eq!(result.confidence, 0.0);
        assert!(result.keywords.is_empty());
    }
}
