// [libs/domain/tx-worker/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TRANSACTION WORKER (ESTRATO L5)
 * RESPONSABILIDAD: ENRIQUECIMIENTO DE DIRECCIONES BITCOIN
 * =================================================================
 */

pub mod analysis;
pub mod errors;
pub mod explorer;
pub mod worker;

pub use analysis::{analyze_transaction, TransactionAnalysis};
pub use errors::{TxWorkerError, TxWorkerResult};
pub use explorer::{BlockchainExplorerClient, ExplorerTransaction};
pub use worker::{TransactionWorker, TxWorkerConfig};
