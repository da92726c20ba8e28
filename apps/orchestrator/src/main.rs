// [apps/orchestrator/src/main.rs]
/*!
 * =================================================================
 * APARATO: ORCHESTRATOR ENTRY POINT (ESTRATO L3)
 * RESPONSABILIDAD: IGNICIÓN DEL PROCESO
 * =================================================================
 */

mod config;
mod handlers;
mod kernel;
mod routes;
mod state;

use config::OrchestratorConfig;
use kernel::OrchestratorKernel;
use onyx_shared_telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("onyx_orchestrator");

    let config = OrchestratorConfig::from_env();
    let kernel = OrchestratorKernel::ignite(config).await?;
    kernel.run().await
}
