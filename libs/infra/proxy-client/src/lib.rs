// [libs/infra/proxy-client/src/lib.rs]
mod client;
pub mod errors;

pub use client::ProxyClient;
pub use errors::{ProxyError, ProxyResult};
