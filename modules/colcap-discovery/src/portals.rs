/// How a portal paginates past page 1. Ported from the per-domain branch in
/// `NewsPortalIndexer.index_portal` (`original_source/src/producer/news_indexer.py`),
/// which special-cases eltiempo.com onto a path segment and leaves every
/// other portal on a `?page=` query parameter.
#[derive(Clone, Copy)]
pub enum PaginationStyle {
    QueryParam,
    PathSegment,
}

/// Fixed per-domain section and pagination config for the portal-scrape
/// fallback. Sections, `max_pages`, and pagination style are ported
/// verbatim from `NewsPortalIndexer.portals`
/// (`original_source/src/producer/news_indexer.py:26-70`) — spec.md names
/// the fallback strategy but not its per-domain table, so it is resolved
/// from the original.
pub struct PortalConfig {
    pub domain: &'static str,
    pub sections: &'static [&'static str],
    pub max_pages: u32,
    pub pagination: PaginationStyle,
}

impl PortalConfig {
    /// Build the page URL for `section` at `page` (1-indexed).
    pub fn paginated_url(&self, section: &str, page: u32) -> String {
        if page <= 1 {
            return format!("https://www.{}{section}", self.domain);
        }
        match self.pagination {
            PaginationStyle::QueryParam => {
                format!("https://www.{}{section}?page={page}", self.domain)
            }
            PaginationStyle::PathSegment => {
                format!("https://www.{}{section}/page/{page}", self.domain)
            }
        }
    }
}

pub fn default_portals() -> Vec<PortalConfig> {
    vec![
        PortalConfig {
            domain: "larepublica.co",
            sections: &[
                "/economia",
                "/finanzas",
                "/empresas",
                "/globoeconomia",
                "/economia/gobierno",
                "/economia/macroeconomia",
                "/finanzas/bancos",
                "/finanzas/mercado-de-valores",
                "/empresas/energia",
                "/empresas/transporte",
                "/archivo/economia",
                "/archivo/finanzas",
            ],
            max_pages: 5,
            pagination: PaginationStyle::QueryParam,
        },
        PortalConfig {
            domain: "portafolio.co",
            sections: &[
                "/economia",
                "/finanzas",
                "/empresas",
                "/negocios",
                "/economia/gobierno",
                "/economia/finanzas-publicas",
                "/negocios/empresas",
                "/internacional",
                "/tendencias",
                "/mis-finanzas",
            ],
            max_pages: 5,
            pagination: PaginationStyle::QueryParam,
        },
        PortalConfig {
            domain: "eltiempo.com",
            sections: &[
                "/economia",
                "/politica",
                "/colombia",
                "/bogota",
                "/economia/sectores",
                "/economia/finanzas-personales",
                "/mundo",
                "/tecnosfera",
            ],
            max_pages: 3,
            pagination: PaginationStyle::PathSegment,
        },
        PortalConfig {
            domain: "elespectador.com",
            sections: &[
                "/economia",
                "/negocios",
                "/politica",
                "/colombia",
                "/economia/macroeconomia",
                "/economia/finanzas",
                "/mundo",
                "/tecnologia",
            ],
            max_pages: 3,
            pagination: PaginationStyle::QueryParam,
        },
    ]
}

/// Select portal configs restricted to `target_domains`, preserving the
/// configuration order `default_portals()` declares.
pub fn portals_for(target_domains: &[String]) -> Vec<PortalConfig> {
    default_portals()
        .into_iter()
        .filter(|p| target_domains.iter().any(|d| d == p.domain))
        .collect()
}
