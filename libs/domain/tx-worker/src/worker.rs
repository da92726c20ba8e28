// [libs/domain/tx-worker/src/worker.rs]
/*!
 * =================================================================
 * APARATO: TRANSACTION WORKER (ESTRATO L5)
 * RESPONSABILIDAD: BUCLE DE ENRIQUECIMIENTO DE DIRECCIONES
 * =================================================================
 */

use std::time::Duration;

use onyx_infra_store::{AddressRepository, TransactionRepository};
use tracing::{info, instrument, warn};

use crate::analysis::analyze_transaction;
use crate::errors::TxWorkerResult;
use crate::explorer::BlockchainExplorerClient;

#[derive(Debug, Clone)]
pub struct TxWorkerConfig {
    pub batch_size: u32,
    pub sleep_interval: Duration,
}

impl Default for TxWorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            sleep_interval: Duration::from_secs(15),
        }
    }
}

/// Pulls valid, not-yet-analyzed addresses and enriches them with
/// transaction history from the configured blockchain explorer.
pub struct TransactionWorker {
    addresses: AddressRepository,
    transactions: TransactionRepository,
    explorer: BlockchainExplorerClient,
    config: TxWorkerConfig,
}

impl TransactionWorker {
    pub fn new(
        addresses: AddressRepository,
        transactions: TransactionRepository,
        explorer: BlockchainExplorerClient,
        config: TxWorkerConfig,
    ) -> Self {
        Self { addresses, transactions, explorer, config }
    }

    /// Runs forever, sleeping `sleep_interval` whenever a pull comes back
    /// empty — mirrors the Page Analyzer's idle-backoff shape. A
    /// `StorageError` from the batch pull itself is logged and retried
    /// with a doubling backoff capped at `sleep_interval`, never unwound
    /// out of the loop (`spec.md` §7/§9).
    #[instrument(skip(self))]
    pub async fn run(&self) -> TxWorkerResult<()> {
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
                    warn!(%error, "💥 transaction worker batch pull failed, backing off and retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(self.config.sleep_interval);
                }
            }
        }
    }

    /// One pull-and-enrich pass. Returns the number of addresses pulled.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> TxWorkerResult<usize> {
        let batch = self.addresses.pending_for_analysis(self.config.batch_size).await?;
        for address in &batch {
            if let Err(error) = self.enrich_address(&address.address_id, &address.address).await {
                warn!(address_id = %address.address_id, %error, "💥 transaction enrichment failed");
            }
        }
        Ok(batch.len())
    }

    async fn enrich_address(&self, address_id: &str, address: &str) -> TxWorkerResult<()> {
        let history = self.explorer.fetch_history(address).await.unwrap_or_else(|error| {
            warn!(%address, %error, "🌐 blockchain explorer fetch failed, marking analyzed anyway");
            Vec::new()
        });

        for tx in &history {
            let analysis = analyze_transaction(tx, address_id);
            for summary in &analysis.summaries {
                self.transactions.insert_summary(summary).await?;
            }
            for edge in &analysis.edges {
                self.transactions.insert_edge(edge).await?;
            }
        }

        self.addresses.mark_tx_analyzed(address_id).await?;
        info!(address_id, tx_count = history.len(), "🔗 address transaction history analyzed");
        Ok(())
    }
}
