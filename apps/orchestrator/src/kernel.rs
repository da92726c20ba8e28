// [apps/orchestrator/src/kernel.rs]
/*!
 * =================================================================
 * APARATO: ORCHESTRATOR KERNEL (ESTRATO L3 — COMPOSITION ROOT)
 * RESPONSABILIDAD: IGNICIÓN DE INFRAESTRUCTURA Y TRABAJADORES
 *
 * La única raíz de composición del proceso: abre el Store y el túnel
 * SOCKS5, arranca los trabajadores continuos (Analyzer, Tx Worker,
 * Correlator) como tareas independientes, y sirve la superficie de
 * control HTTP. El Crawler se arranca/detiene bajo demanda vía esa
 * superficie (`handlers::start_crawl`/`stop_crawl`), nunca aquí.
 *
 * Liveness Tracker y Classifier no se enganchan a ningún bucle de este
 * proceso — `spec.md` §4.10 los declara sin cadencia interna; quedan
 * disponibles como bibliotecas para un invocador externo (cron, script
 * de operador).
 * =================================================================
 */

use std::net::SocketAddr;
use std::time::Duration;

use onyx_domain_analyzer::{AnalyzerConfig, PageAnalyzer};
use onyx_domain_correlator::Correlator;
use onyx_domain_tx_worker::{BlockchainExplorerClient, TransactionWorker, TxWorkerConfig};
use onyx_infra_proxy_client::ProxyClient;
use onyx_infra_store::{AddressRepository, MetadataRepository, PageRepository, Store, VendorRepository};
use tracing::{error, info, instrument};

use crate::config::OrchestratorConfig;
use crate::routes::build_router;
use crate::state::AppState;

/// Interval between full correlation passes. Every stage is idempotent,
/// so running it more often than new addresses/transactions arrive is
/// harmless, just wasted work — 2 minutes is a reasonable default.
const CORRELATION_INTERVAL: Duration = Duration::from_secs(120);

pub struct OrchestratorKernel {
    state: AppState,
}

impl OrchestratorKernel {
    #[instrument(skip(config))]
    pub async fn ignite(config: OrchestratorConfig) -> anyhow::Result<Self> {
        let store = Store::connect(&config.database_url).await?;
        let proxy = ProxyClient::new(&config.socks_proxy)?;
        let state = AppState::new(store, proxy, config);
        Ok(Self { state })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        self.spawn_page_analyzer();
        self.spawn_transaction_worker();
        self.spawn_correlator();

        let port = self.state.config.port;
        let router = build_router(self.state);
        let bind_address = SocketAddr::from(([0, 0, 0, 0], port));

        info!(%bind_address, "🛰️ control surface listening");
        let listener = tokio::net::TcpListener::bind(bind_address).await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    fn spawn_page_analyzer(&self) {
        let store = self.state.store.clone();
        tokio::spawn(async move {
            let analyzer = PageAnalyzer::new(
                PageRepository::new(store.clone()),
                MetadataRepository::new(store.clone()),
                AddressRepository::new(store),
                AnalyzerConfig::default(),
            );
            if let Err(error) = analyzer.run().await {
                error!(%error, "💥 page analyzer task exited");
            }
        });
    }

    fn spawn_transaction_worker(&self) {
        let store = self.state.store.clone();
        let explorer_base_url = self.state.config.explorer_base_url.clone();
        tokio::spawn(async move {
            let worker = TransactionWorker::new(
                AddressRepository::new(store.clone()),
                onyx_infra_store::TransactionRepository::new(store),
                BlockchainExplorerClient::new(explorer_base_url),
                TxWorkerConfig::default(),
            );
            if let Err(error) = worker.run().await {
                error!(%error, "💥 transaction worker task exited");
            }
        });
    }

    fn spawn_correlator(&self) {
        let store = self.state.store.clone();
        tokio::spawn(async move {
            loop {
                let correlator = Correlator::new(
                    AddressRepository::new(store.clone()),
                    MetadataRepository::new(store.clone()),
                    VendorRepository::new(store.clone()),
                );
                if let Err(error) = correlator.run().await {
                    error!(%error, "💥 correlation pass failed");
                }
                tokio::time::sleep(CORRELATION_INTERVAL).await;
            }
        });
    }
}
