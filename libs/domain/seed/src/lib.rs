// [libs/domain/seed/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SEED COLLECTOR (ESTRATO L5 — DESCUBRIMIENTO)
 * RESPONSABILIDAD: PRODUCCIÓN DE URLS ONION CANDIDATAS
 *
 * Tres orígenes: búsqueda por palabra clave en clearnet, archivo local,
 * y envío directo del operador. Las tres convergen en un único punto de
 * entrega al LinkManager (§4.5 — "submits them to LinkManager"), que el
 * proceso propietario (el worker Crawler) invoca desde su propio loop
 * para preservar el acceso de único propietario de esa cola.
 * =================================================================
 */

pub mod errors;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use onyx_domain_models::identity::is_onion_host;
use onyx_domain_models::SiteRecord;
use onyx_infra_link_manager::LinkManager;
use onyx_infra_store::{SiteRepository, StoreResult};
use regex::Regex;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use errors::SeedResult;

static ONION_LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[a-zA-Z0-9\-\.]{16,56}\.onion(?:/[^\s\x22\x27<>]*)?").expect("static regex must compile")
});

/// Where a batch of candidate onion URLs is supposed to come from.
#[derive(Debug, Clone)]
pub enum SeedSource {
    Keyword(String),
    File(PathBuf),
    Operator(String),
}

/// Default number of result pages requested per keyword (mirrors the
/// original Ahmia-style paginated search sweep).
const DEFAULT_MAX_PAGES: u32 = 8;
const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF_BASE: Duration = Duration::from_millis(250);

pub struct SeedCollector {
    search_client: reqwest::Client,
    search_endpoint_template: String,
    max_pages: u32,
    concurrency: usize,
}

impl SeedCollector {
    /// `search_endpoint_template` contains `{keyword}` and `{start}`
    /// placeholders, e.g. `"https://ahmia.fi/search/?q={keyword}&start={start}"`.
    pub fn new(search_client: reqwest::Client, search_endpoint_template: impl Into<String>) -> Self {
        Self {
            search_client,
            search_endpoint_template: search_endpoint_template.into(),
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: 5,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Runs one `SeedSource` to completion, returning the set of onion URLs
    /// it surfaced. Callers are responsible for feeding the result into a
    /// `LinkManager`/`Store` pair via [`submit_discoveries`].
    pub async fn collect(&self, source: &SeedSource) -> SeedResult<Vec<String>> {
        match source {
            SeedSource::Keyword(keyword) => self.collect_from_keyword(keyword).await,
            SeedSource::File(path) => collect_from_file(path).await,
            SeedSource::Operator(url) => Ok(collect_from_operator(url)),
        }
    }

    async fn collect_from_keyword(&self, keyword: &str) -> SeedResult<Vec<String>> {
        let semaphore = std::sync::Arc::new(Semaphore::new(self.concurrency));
        let mut fetches = Vec::new();

        for page in 0..self.max_pages {
            let start = page * 10;
            let url = self
                .search_endpoint_template
                .replace("{keyword}", keyword)
                .replace("{start}", &start.to_string());
            fetches.push(self.fetch_with_retry(url, semaphore.clone()));
        }

        let pages = futures::future::join_all(fetches).await;

        let mut discovered = HashSet::new();
        for page in pages.into_iter().flatten() {
            for found in ONION_LINK_PATTERN.find_iter(&page) {
                discovered.insert(found.as_str().to_string());
            }
        }

        info!("🔎 [SEED]: keyword '{keyword}' surfaced {} candidate links", discovered.len());
        Ok(discovered.into_iter().collect())
    }

    async fn fetch_with_retry(&self, url: String, semaphore: std::sync::Arc<Semaphore>) -> Option<String> {
        let _permit = semaphore.acquire().await.ok()?;
        for attempt in 1..=RETRY_ATTEMPTS {
            match self.search_client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    return response.text().await.ok();
                }
                Ok(response) => {
                    warn!("⚠️ [SEED]: non-success status {} fetching {url}", response.status());
                }
                Err(e) => {
                    warn!("⚠️ [SEED]: fetch attempt {attempt}/{RETRY_ATTEMPTS} failed for {url}: {e}");
                }
            }
            tokio::time::sleep(RETRY_BACKOFF_BASE * attempt).await;
        }
        None
    }
}

async fn collect_from_file(path: &Path) -> SeedResult<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains(".onion"))
        .map(str::to_string)
        .collect())
}

fn collect_from_operator(url: &str) -> Vec<String> {
    let trimmed = url.trim();
    if is_onion_host(trimmed) {
        vec![trimmed.to_string()]
    } else {
        warn!("⚠️ [SEED]: operator URL rejected, not an onion host: {trimmed}");
        Vec::new()
    }
}

/// Validates, persists, and queues each discovered URL through the owning
/// `LinkManager`/`Store` pair. Only URLs newly inserted into the store are
/// queued, matching §4.5's "queue only if newly inserted" contract.
pub async fn submit_discoveries(
    link_manager: &mut LinkManager,
    site_repository: &SiteRepository,
    urls: &[String],
    source: &str,
    keyword: &str,
) -> StoreResult<usize> {
    let mut queued = 0;
    for url in urls {
        if !is_onion_host(url) {
            continue;
        }

        let site = SiteRecord::new(url, source, keyword);
        let newly_inserted = site_repository.upsert_site(&site).await?;
        if newly_inserted && link_manager.add_site(url, source) {
            queued += 1;
        }
    }
    Ok(queued)
}
