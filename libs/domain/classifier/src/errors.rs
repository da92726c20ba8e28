// [libs/domain/classifier/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("[L5_CLASSIFIER_STORE_FAULT]: {0}")]
    StoreFault(#[from] onyx_infra_store::StoreError),
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;
