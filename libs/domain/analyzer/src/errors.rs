// [libs/domain/analyzer/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("[L5_ANALYZER_STORE_FAULT]: {0}")]
    StoreFault(#[from] onyx_infra_store::StoreError),
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
