// [libs/domain/tx-worker/src/explorer.rs]
/*!
 * =================================================================
 * APARATO: BLOCKCHAIN EXPLORER CLIENT (ESTRATO L5)
 * RESPONSABILIDAD: CONSUMO DEL API EXTERNO DE TRANSACCIONES
 *
 * `spec.md` §6 especifica un explorador JSON en `/address/{addr}/txs`
 * sin nombrar el proveedor; esta forma de payload es la de un explorador
 * estilo Esplora/Blockstream, confirmada contra
 * `original_source/Analysis/transaction_analyzer.py` (ver `DESIGN.md`).
 * =================================================================
 */

use std::time::Duration;

use serde::Deserialize;

use crate::errors::TxWorkerResult;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerTransaction {
    pub txid: String,
    pub vin: Vec<ExplorerVin>,
    pub vout: Vec<ExplorerVout>,
    pub status: Option<ExplorerStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerVin {
    pub prevout: Option<ExplorerPrevout>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerPrevout {
    pub scriptpubkey_address: Option<String>,
    pub value: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerVout {
    pub scriptpubkey_address: Option<String>,
    pub value: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerStatus {
    pub confirmed: bool,
    pub block_time: Option<i64>,
}

/// A thin adapter over a single explorer endpoint. Holds no SOCKS
/// configuration — the blockchain explorer is consumed over clearnet,
/// unlike onion-service fetches (`spec.md` §1: "rate-limited external
/// collaborator").
#[derive(Clone)]
pub struct BlockchainExplorerClient {
    http: reqwest::Client,
    base_url: String,
}

impl BlockchainExplorerClient {
    /// `base_url` has no trailing slash, e.g. `https://blockstream.info/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("static reqwest client config must build"),
            base_url: base_url.into(),
        }
    }

    /// Fetches the full transaction history for one address. An empty
    /// vector (not an error) is returned for addresses the explorer has
    /// never seen.
    pub async fn fetch_history(&self, address: &str) -> TxWorkerResult<Vec<ExplorerTransaction>> {
        let url = format!("{}/address/{address}/txs", self.base_url);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Ok(Vec::new());
        }
        let txs = response.json::<Vec<ExplorerTransaction>>().await.unwrap_or_default();
        Ok(txs)
    }
}
