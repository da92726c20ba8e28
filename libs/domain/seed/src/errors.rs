// [libs/domain/seed/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("[L5_SEED_IO_FAULT]: failed to read seed file -> {0}")]
    IoFault(#[from] std::io::Error),

    #[error("[L5_SEED_NET_FAULT]: search endpoint fetch failed after retries -> {0}")]
    NetworkFault(String),
}

pub type SeedResult<T> = Result<T, SeedError>;
