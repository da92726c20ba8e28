// [libs/infra/proxy-client/src/client.rs]
/*!
 * =================================================================
 * APARATO: PROXY UPLINK CLIENT (ESTRATO L4)
 * RESPONSABILIDAD: TÚNEL SOCKS5 HACIA LA RED TOR, SIN FUGAS DE ENTORNO
 *
 * `reqwest::Client::builder()` solo honra `HTTP_PROXY`/`HTTPS_PROXY` del
 * entorno del proceso cuando el builder no recibe un proxy explícito. Al
 * fijar siempre `reqwest::Proxy::all(...)`, este aparato queda inmune a
 * una variable de entorno que intente desviar el tráfico fuera del túnel.
 * =================================================================
 */

use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::{info, instrument};

use crate::errors::{ProxyError, ProxyResult};

/// Total deadline for a single crawl fetch (politeness window included on
/// the caller's side, not here).
const CRAWL_TOTAL_TIMEOUT: Duration = Duration::from_secs(25);

/// Total deadline for a liveness probe — generous, since a slow-but-alive
/// onion service should not be misclassified as dead.
const LIVENESS_TOTAL_TIMEOUT: Duration = Duration::from_secs(45);
const LIVENESS_CONNECT_TIMEOUT: Duration = Duration::from_secs(8);

/// A `reqwest::Client` tunneled through a single SOCKS5 endpoint (the local
/// Tor daemon, by convention `127.0.0.1:9050`), exposed as two
/// purpose-built sessions with distinct timeout profiles.
#[derive(Clone)]
pub struct ProxyClient {
    crawl_session: Client,
    liveness_session: Client,
}

impl ProxyClient {
    /// `socks_endpoint` is a bare `host:port` pair (no scheme) pointing at
    /// the Tor SOCKS5 listener. `socks5h://` is used explicitly so that
    /// hostname resolution of `.onion` addresses happens on the Tor side
    /// of the tunnel, never locally.
    #[instrument(skip(socks_endpoint), fields(endpoint = %socks_endpoint))]
    pub fn new(socks_endpoint: &str) -> ProxyResult<Self> {
        if socks_endpoint.trim().is_empty() {
            return Err(ProxyError::ConfigurationError("empty SOCKS5 endpoint".to_string()));
        }

        let proxy_url = format!("socks5h://{socks_endpoint}");
        info!("🧅 [PROXY]: Wiring Tor uplink via [{proxy_url}]");

        let crawl_proxy = Proxy::all(&proxy_url)
            .map_err(|e| ProxyError::ConfigurationError(e.to_string()))?;
        let crawl_session = Client::builder()
            .proxy(crawl_proxy)
            .timeout(CRAWL_TOTAL_TIMEOUT)
            .user_agent("Mozilla/5.0 (compatible; OnyxWatch-Crawler/1.0)")
            .build()
            .map_err(|e| ProxyError::BuildError(e.to_string()))?;

        let liveness_proxy = Proxy::all(&proxy_url)
            .map_err(|e| ProxyError::ConfigurationError(e.to_string()))?;
        let liveness_session = Client::builder()
            .proxy(liveness_proxy)
            .timeout(LIVENESS_TOTAL_TIMEOUT)
            .connect_timeout(LIVENESS_CONNECT_TIMEOUT)
            .user_agent("Mozilla/5.0 (compatible; OnyxWatch-Liveness/1.0)")
            .build()
            .map_err(|e| ProxyError::BuildError(e.to_string()))?;

        Ok(Self {
            crawl_session,
            liveness_session,
        })
    }

    /// Fetches `url` under the 25s crawl timeout profile.
    #[instrument(skip(self))]
    pub async fn fetch_crawl(&self, url: &str) -> ProxyResult<reqwest::Response> {
        Ok(self.crawl_session.get(url).send().await?)
    }

    /// Fetches `url` under the 45s liveness timeout profile (8s connect
    /// sub-timeout). Intended for the Liveness Tracker's periodic sweep.
    #[instrument(skip(self))]
    pub async fn fetch_liveness(&self, url: &str) -> ProxyResult<reqwest::Response> {
        Ok(self.liveness_session.get(url).send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_socks_endpoint() {
        let result = ProxyClient::new("");
        assert!(result.is_err());
    }

    #[test]
    fn builds_with_a_well_formed_endpoint() {
        let client = ProxyClient::new("127.0.0.1:9050");
        assert!(client.is_ok());
    }
}
