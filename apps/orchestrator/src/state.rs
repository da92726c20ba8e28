// [apps/orchestrator/src/state.rs]
/*!
 * =================================================================
 * APARATO: ORCHESTRATOR STATE (ESTRATO L3)
 * RESPONSABILIDAD: ESTADO COMPARTIDO DEL PROCESO DE CONTROL
 * =================================================================
 */

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use onyx_infra_proxy_client::ProxyClient;
use onyx_infra_store::Store;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::OrchestratorConfig;

/// Coarse crawl lifecycle, matching the control surface's `state` field
/// one-to-one (`SPEC_FULL.md` §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlPhase {
    Idle,
    Starting,
    Running,
    Completed,
    Stopped,
    Error,
}

pub struct CrawlState {
    pub phase: CrawlPhase,
    pub message: String,
    /// Present only while a crawl task is running; `/v1/crawl/stop` flips
    /// it and lets the scheduler exit at its next loop boundary.
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for CrawlState {
    fn default() -> Self {
        Self {
            phase: CrawlPhase::Idle,
            message: "no crawl has been started yet".to_string(),
            stop_flag: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub proxy: ProxyClient,
    pub config: Arc<OrchestratorConfig>,
    pub crawl: Arc<Mutex<CrawlState>>,
}

impl AppState {
    pub fn new(store: Store, proxy: ProxyClient, config: OrchestratorConfig) -> Self {
        Self {
            store,
            proxy,
            config: Arc::new(config),
            crawl: Arc::new(Mutex::new(CrawlState::default())),
        }
    }
}
