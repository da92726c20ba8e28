// [libs/domain/crawler/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CRAWLER (ESTRATO L5 — PROGRAMADOR COOPERATIVO)
 * RESPONSABILIDAD: DRENAJE DE COLAS, CLASIFICACIÓN Y REALIMENTACIÓN
 *
 * Orden de bucle fijo: agota la cola interna (con demora educada tras
 * cada obtención), luego extrae un elemento externo, si no hay nada
 * duerme 5s. Los enlaces internos siempre preceden a los externos.
 * =================================================================
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use onyx_domain_models::identity::{sha256_hex, site_root};
use onyx_domain_models::{PageRecord, SiteRecord, SiteStatus};
use onyx_infra_link_manager::LinkManager;
use onyx_infra_proxy_client::ProxyClient;
use onyx_infra_store::{PageRepository, SiteRepository, StoreResult};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{info, instrument, warn};

static RAW_ONION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[a-zA-Z0-9\-\.]{16,56}\.onion(?:/[^\s\x22\x27<>]*)?").expect("static regex must compile")
});

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector must compile"));

/// The result of fetching and classifying one URL, per §4.6's HTTP/timeout
/// error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    Alive,
    Dead,
    Timeout,
    Error,
}

impl From<CrawlOutcome> for SiteStatus {
    fn from(outcome: CrawlOutcome) -> Self {
        match outcome {
            CrawlOutcome::Alive => SiteStatus::Alive,
            CrawlOutcome::Dead => SiteStatus::Dead,
            CrawlOutcome::Timeout => SiteStatus::Timeout,
            CrawlOutcome::Error => SiteStatus::Error,
        }
    }
}

pub struct CrawlerConfig {
    pub max_depth: u32,
    pub polite_delay: Duration,
    pub idle_sleep: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            polite_delay: Duration::from_millis(2_000),
            idle_sleep: Duration::from_secs(5),
        }
    }
}

pub struct Crawler {
    proxy: ProxyClient,
    sites: SiteRepository,
    pages: PageRepository,
    config: CrawlerConfig,
    stop_flag: Arc<AtomicBool>,
}

impl Crawler {
    pub fn new(proxy: ProxyClient, sites: SiteRepository, pages: PageRepository, config: CrawlerConfig) -> Self {
        Self {
            proxy,
            sites,
            pages,
            config,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A clone of the stop flag callers can set to request a graceful
    /// shutdown; the loop only checks it at iteration boundaries, never
    /// mid-transaction.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// The main scheduler loop described in §4.6: drain inner to empty,
    /// then one outer, else sleep.
    #[instrument(skip(self, link_manager))]
    pub async fn run(&self, link_manager: &mut LinkManager) -> StoreResult<()> {
        info!("🕷️ [CRAWLER]: scheduler engaged");

        while !self.stop_flag.load(Ordering::Relaxed) {
            let mut drained_any = false;

            while !self.stop_flag.load(Ordering::Relaxed) {
                let Some(link) = link_manager.pop_inner_link() else {
                    break;
                };
                drained_any = true;
                self.process_url(link_manager, &link.url, "InnerLink", link.depth).await?;
                tokio::time::sleep(self.config.polite_delay).await;
            }

            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }

            if let Some(outer) = link_manager.pop_outer_link() {
                drained_any = true;
                self.process_url(link_manager, &outer.site_root, &outer.source, 0).await?;
                tokio::time::sleep(self.config.polite_delay).await;
            }

            if !drained_any {
                info!("🕸️ [CRAWLER]: queues empty, waiting for refill...");
                tokio::time::sleep(self.config.idle_sleep).await;
            }
        }

        info!("🛑 [CRAWLER]: scheduler stopped gracefully");
        Ok(())
    }

    #[instrument(skip(self, link_manager, url), fields(url = %url, source = %source, depth = depth))]
    async fn process_url(
        &self,
        link_manager: &mut LinkManager,
        url: &str,
        source: &str,
        depth: u32,
    ) -> StoreResult<()> {
        let is_outer = source != "InnerLink";
        let outcome_and_body = self.fetch_and_classify(url).await;

        let (outcome, body) = match outcome_and_body {
            Ok((outcome, body)) => (outcome, body),
            Err(outcome) => (outcome, None),
        };

        if is_outer {
            let root = site_root(url);
            let site_id = sha256_hex(&root);
            self.sites.update_status(&site_id, outcome.into()).await?;
        }

        let (CrawlOutcome::Alive, Some(html)) = (outcome, body) else {
            return Ok(());
        };

        let page = PageRecord::new(url, html.clone().into_bytes());
        self.pages.upsert_page(&page).await?;

        let current_root = site_root(url);
        for link in extract_onion_links(&html, url) {
            let link_root = site_root(&link);
            if link_root == current_root {
                if depth + 1 <= self.config.max_depth {
                    link_manager.add_inner_page(&link, depth + 1);
                } else {
                    warn!("⚠️ [CRAWLER]: dropped {link}, beyond max depth {}", self.config.max_depth);
                }
            } else {
                let exploratory = SiteRecord::new(&link, "Exploratory", "");
                self.sites.upsert_site(&exploratory).await?;
                link_manager.add_site(&link, "Exploratory");
            }
        }

        Ok(())
    }

    async fn fetch_and_classify(&self, url: &str) -> Result<(CrawlOutcome, Option<String>), CrawlOutcome> {
        match self.proxy.fetch_crawl(url).await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() || status.is_redirection() {
                    match response.text().await {
                        Ok(body) => Ok((CrawlOutcome::Alive, Some(body))),
                        Err(_) => Err(CrawlOutcome::Error),
                    }
                } else {
                    Err(CrawlOutcome::Dead)
                }
            }
            Err(e) => {
                if e.to_string().to_lowercase().contains("timed out") || e.to_string().to_lowercase().contains("timeout") {
                    Err(CrawlOutcome::Timeout)
                } else {
                    Err(CrawlOutcome::Error)
                }
            }
        }
    }
}

/// Extracts `.onion` links from both anchor `href` attributes (resolved
/// against `base_url`) and raw regex matches over the HTML source, then
/// normalizes by trimming trailing slashes.
pub fn extract_onion_links(html: &str, base_url: &str) -> Vec<String> {
    let mut links = std::collections::HashSet::new();
    let document = Html::parse_document(html);

    for anchor in document.select(&ANCHOR_SELECTOR) {
        if let Some(href) = anchor.value().attr("href") {
            if let Some(resolved) = resolve_href(base_url, href.trim()) {
                if resolved.contains(".onion") {
                    links.insert(resolved.trim_end_matches('/').to_string());
                }
            }
        }
    }

    for found in RAW_ONION_PATTERN.find_iter(html) {
        links.insert(found.as_str().trim_end_matches('/').to_string());
    }

    links.into_iter().collect()
}

/// A minimal `href` resolver: passes absolute URLs through unchanged,
/// resolves root-relative (`/path`) and same-directory relative hrefs
/// against `base_url`'s scheme+host, and drops fragment-only/empty hrefs.
fn resolve_href(base_url: &str, href: &str) -> Option<String> {
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    let root = site_root(base_url);
    if let Some(stripped) = href.strip_prefix('/') {
        return Some(format!("{root}/{stripped}"));
    }
    Some(format!("{}/{}", base_url.trim_end_matches('/'), href))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_onion_links_collects_hrefs_and_raw_matches() {
        let html = r#"
            <html><body>
                <a href="http://other16charslong.onion/path">link</a>
                <a href="/inner">inner</a>
                <p>raw mention of http://raw1234567890123.onion/x/</p>
            </body></html>
        "#;
        let links = extract_onion_links(html, "http://base1234567890123.onion/page");

        assert!(links.iter().any(|l| l == "http://other16charslong.onion/path"));
        assert!(links.iter().any(|l| l == "http://raw1234567890123.onion/x"));
        assert!(links.iter().any(|l| l.contains("base1234567890123.onion/inner")));
    }

    #[test]
    fn resolve_href_passes_absolute_urls_through() {
        assert_eq!(
            resolve_href("http://a.onion/x", "http://b.onion/y"),
            Some("http://b.onion/y".to_string())
        );
    }

    #[test]
    fn resolve_href_drops_fragments_and_scripts() {
        assert_eq!(resolve_href("http://a.onion/x", "#top"), None);
        assert_eq!(resolve_href("http://a.onion/x", "javascript:void(0)"), None);
    }
}
