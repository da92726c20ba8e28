// [apps/orchestrator/src/config.rs]
/*!
 * =================================================================
 * APARATO: ORCHESTRATOR CONFIG (ESTRATO L3)
 * RESPONSABILIDAD: LECTURA TIPADA DE VARIABLES DE ENTORNO
 * =================================================================
 */

use std::time::Duration;

/// Every field has a documented default so a bare `.env`-less boot still
/// comes up in a sane local-development shape.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// `DATABASE_URL` — libsql local file path, or `:memory:`. Default: `onyx.db`.
    pub database_url: String,
    /// `SOCKS_PROXY` — Tor SOCKS5 endpoint. Default: `127.0.0.1:9050`.
    pub socks_proxy: String,
    /// `EXPLORER_BASE_URL` — blockchain explorer API root. Default: Blockstream.
    pub explorer_base_url: String,
    /// `SEARCH_ENDPOINT_TEMPLATE` — clearnet keyword search template with
    /// `{keyword}`/`{start}` placeholders. Default: an Ahmia-style search.
    pub search_endpoint_template: String,
    /// `PORT` — HTTP control-surface port. Default: `3000`.
    pub port: u16,
    /// `CRAWL_MAX_DEPTH` — default `max_depth` when a start request omits one.
    pub crawl_max_depth: u32,
    /// `CRAWL_POLITE_DELAY_MS` — default `polite_delay` in milliseconds.
    pub crawl_polite_delay_ms: u64,
}

impl OrchestratorConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env_or("DATABASE_URL", "onyx.db"),
            socks_proxy: env_or("SOCKS_PROXY", "127.0.0.1:9050"),
            explorer_base_url: env_or("EXPLORER_BASE_URL", "https://blockstream.info/api"),
            search_endpoint_template: env_or(
                "SEARCH_ENDPOINT_TEMPLATE",
                "https://ahmia.fi/search/?q={keyword}&start={start}",
            ),
            port: env_or("PORT", "3000").parse().unwrap_or(3000),
            crawl_max_depth: env_or("CRAWL_MAX_DEPTH", "2").parse().unwrap_or(2),
            crawl_polite_delay_ms: env_or("CRAWL_POLITE_DELAY_MS", "2000").parse().unwrap_or(2000),
        }
    }

    pub fn polite_delay(&self) -> Duration {
        Duration::from_millis(self.crawl_polite_delay_ms)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
