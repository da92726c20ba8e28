// [libs/domain/correlator/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorrelatorError {
    #[error("[L5_CORRELATOR_STORE_FAULT]: {0}")]
    StoreFault(#[from] onyx_infra_store::StoreError),
}

pub type CorrelatorResult<T> = Result<T, CorrelatorError>;
