// [libs/domain/analyzer/src/worker.rs]
/*!
 * =================================================================
 * APARATO: PAGE ANALYZER WORKER (ESTRATO L5)
 * RESPONSABILIDAD: BUCLE DE EXTRACCIÓN POR LOTES SOBRE PÁGINAS CRUDAS
 *
 * Un error en una sola página se registra y se salta (§7 de `spec.md`:
 * "ParseFailure ... never fatal"); el bucle en sí nunca termina el
 * proceso por una página malformada.
 * =================================================================
 */

use std::time::Duration;

use onyx_domain_models::{BitcoinAddress, PageRecord};
use onyx_infra_store::{AddressRepository, MetadataRepository, PageRepository};
use tracing::{info, instrument, warn};

use crate::bitcoin::extract_addresses;
use crate::errors::AnalyzerResult;
use crate::extraction::extract_metadata;

pub struct AnalyzerConfig {
    pub batch_size: u32,
    pub sleep_interval: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            sleep_interval: Duration::from_secs(10),
        }
    }
}

pub struct PageAnalyzer {
    pages: PageRepository,
    metadata: MetadataRepository,
    addresses: AddressRepository,
    config: AnalyzerConfig,
}

impl PageAnalyzer {
    pub fn new(
        pages: PageRepository,
        metadata: MetadataRepository,
        addresses: AddressRepository,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            pages,
            metadata,
            addresses,
            config,
        }
    }

    /// Runs forever: pulls a bounded batch of un-analyzed pages, analyzes
    /// each, sleeps `sleep_interval` when the batch comes back empty.
    /// Intended to be spawned as an independent `tokio::task`; stops only
    /// when the task itself is aborted by its caller. A `StorageError` from
    /// `run_once` (batch pull itself failing, not a single page) never
    /// unwinds the loop — per `spec.md` §7/§9 it is logged and the loop
    /// backs off and retries, doubling the wait up to `sleep_interval`.
    #[instrument(skip(self))]
    pub async fn run(&self) -> AnalyzerResult<()> {
        info!("🔬 [ANALYZER]: page analysis loop engaged");
        let mut backoff = Duration::from_secs(1);
        loop {
            match self.run_once().await {
                Ok(processed) => {
                    backoff = Duration::from_secs(1);
                    if processed == 0 {
                        tokio::time::sleep(self.config.sleep_interval).await;
                    }
                }
                Err(error) => {
                    warn!(%error, "💥 page analyzer batch pull failed, backing off and retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(self.config.sleep_interval);
                }
            }
        }
    }

    /// One batch pass; returns the number of pages pulled (0 means the
    /// caller should back off before trying again).
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> AnalyzerResult<usize> {
        let pages = self.pages.pages_without_metadata(self.config.batch_size).await?;
        for page in &pages {
            if let Err(e) = self.analyze_page(page).await {
                warn!("⚠️ [ANALYZER]: skipping page {} after error: {e}", page.page_id);
            }
        }
        Ok(pages.len())
    }

    async fn analyze_page(&self, page: &PageRecord) -> AnalyzerResult<()> {
        let metadata = extract_metadata(&page.page_id, &page.raw_html);
        self.metadata.insert(&metadata).await?;

        let text = String::from_utf8_lossy(&page.raw_html);
        for candidate in extract_addresses(&text) {
            let address = BitcoinAddress::new(&candidate.address, &page.site_id, &page.page_id, candidate.valid);
            self.addresses.insert(&address).await?;
        }

        Ok(())
    }
}
