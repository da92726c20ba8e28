// [libs/infra/store/src/errors.rs]
/*!
 * =================================================================
 * APARATO: STORE ERROR CATALOG (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE PERSISTENCIA
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("[L3_DB_CONFIG_FAULT]: database path is empty")]
    ConfigurationError,

    #[error("[L3_DB_NET_FAULT]: failed to open database link -> {0}")]
    ConnectionError(String),

    #[error("[L3_DB_QUERY_FAULT]: query rejected by libsql engine -> {0}")]
    QueryError(#[from] libsql::Error),

    #[error("[L3_DB_MAPPING_FAULT]: row could not be mapped to a domain record -> {0}")]
    MappingError(String),

    #[error("[L3_DB_FAULT]: batch write could not be committed atomically -> {0}")]
    TransactionError(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
