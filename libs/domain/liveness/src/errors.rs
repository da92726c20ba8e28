// [libs/domain/liveness/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LivenessError {
    #[error("[L5_LIVENESS_STORE_FAULT]: {0}")]
    StoreFault(#[from] onyx_infra_store::StoreError),
}

pub type LivenessResult<T> = Result<T, LivenessError>;
