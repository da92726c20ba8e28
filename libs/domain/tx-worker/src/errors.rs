// [libs/domain/tx-worker/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TxWorkerError {
    #[error("[L5_TXWORKER_STORE_FAULT]: {0}")]
    StoreFault(#[from] onyx_infra_store::StoreError),

    #[error("[L5_TXWORKER_NET_FAULT]: blockchain explorer request failed -> {0}")]
    ExplorerFault(#[from] reqwest::Error),
}

pub type TxWorkerResult<T> = Result<T, TxWorkerError>;
