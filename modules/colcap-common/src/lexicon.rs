//! Static word lists shared by `colcap-discovery` (URL heuristic) and
//! `colcap-worker` (keyword tally). `EXCLUDED_PATTERNS` and `NEWS_SECTIONS`
//! are carried over unchanged from `original_source/src/common/config.py`'s
//! `Config.EXCLUDED_PATTERNS`/`Config.NEWS_SECTIONS`, since
//! `is_valid_news_url` in `original_source/src/common/utils.py` is the
//! literal ground truth for spec.md's URL-acceptance heuristic.
//! `POSITIVE_KEYWORDS`/`NEGATIVE_KEYWORDS` are a deliberate redesign, not a
//! port — see the doc comment on them below.

/// Path substrings that disqualify a URL regardless of other signals.
/// Verbatim from `Config.EXCLUDED_PATTERNS`.
pub const EXCLUDED_PATTERNS: &[&str] = &[
    "robots.txt",
    "sitemap",
    ".xml",
    ".css",
    ".js",
    ".png",
    ".jpg",
    ".gif",
    ".ico",
    ".woff",
    ".ttf",
    "/tag/",
    "/autor/",
    "/autor-",
    "/buscar",
    "/search",
    "/login",
    "/registro",
    "/suscripcion",
    "/privacidad",
    "/terminos",
    "/contacto",
    "/rss",
    "/feed",
];

/// Known news-section path prefixes, one of the two positive signals the
/// heuristic requires (the other being a trailing numeric article id).
/// Verbatim from `Config.NEWS_SECTIONS` — note `/opinion` is a positive
/// signal here, same as in the original, not a blocked pattern.
pub const NEWS_SECTIONS: &[&str] = &[
    "/economia",
    "/finanzas",
    "/negocios",
    "/empresas",
    "/mercados",
    "/politica",
    "/noticias",
    "/actualidad",
    "/colombia",
    "/mundo",
    "/deportes",
    "/cultura",
    "/tecnologia",
    "/opinion",
];

/// Spanish economic-sentiment keyword lexicon, split into polarity buckets.
/// The original worker has no such split: `detect_economic_keywords` in
/// `original_source/src/worker/nlp.py` tallies a single flat
/// `ECONOMIC_KEYWORDS` relevance list, and actual sentiment polarity comes
/// from a `pysentimiento` transformer model, which is out of scope here
/// (spec.md §6). This lexicon is the redesigned, dependency-free substitute
/// for that model — it is not a translation of the original's vocabulary.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "crecimiento",
    "alza",
    "ganancia",
    "ganancias",
    "superávit",
    "recuperación",
    "expansión",
    "utilidades",
    "repunte",
    "optimismo",
    "fortalece",
    "fortalecimiento",
    "inversión",
    "rentable",
    "valorización",
];

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "caída",
    "baja",
    "pérdida",
    "pérdidas",
    "déficit",
    "recesión",
    "contracción",
    "crisis",
    "desplome",
    "pesimismo",
    "debilita",
    "devaluación",
    "quiebra",
    "incertidumbre",
    "inflación",
];
