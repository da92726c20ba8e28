// [libs/infra/proxy-client/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("[L4_PROXY_CONFIG_FAULT]: malformed SOCKS5 endpoint -> {0}")]
    ConfigurationError(String),

    #[error("[L4_PROXY_BUILD_FAULT]: failed to construct HTTP session -> {0}")]
    BuildError(String),

    #[error("[L4_PROXY_NET_FAULT]: request over the Tor uplink failed -> {0}")]
    RequestError(#[from] reqwest::Error),
}

pub type ProxyResult<T> = Result<T, ProxyError>;
