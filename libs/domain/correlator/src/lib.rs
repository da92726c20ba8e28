// [libs/domain/correlator/src/lib.rs]
/*!
 * =================================================================
 * APARATO: VENDOR CORRELATOR (ESTRATO L5)
 * RESPONSABILIDAD: SIEMBRA, FUSIÓN Y PUNTUACIÓN DE IDENTIDADES
 * =================================================================
 */

pub mod errors;
pub mod stages;

use onyx_infra_store::{AddressRepository, MetadataRepository, VendorRepository};
use tracing::{info, instrument};

pub use errors::{CorrelatorError, CorrelatorResult};

/// A single `run()` drives the full four-stage pipeline end to end;
/// every stage is independently idempotent, so re-running the whole
/// pipeline on an unchanged store is a no-op.
pub struct Correlator {
    addresses: AddressRepository,
    metadata: MetadataRepository,
    vendors: VendorRepository,
}

/// Per-stage counts, surfaced for logging and for the orchestrator's
/// status reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationReport {
    pub seeded: usize,
    pub attached: usize,
    pub merged: usize,
    pub scored: usize,
}

impl Correlator {
    pub fn new(addresses: AddressRepository, metadata: MetadataRepository, vendors: VendorRepository) -> Self {
        Self { addresses, metadata, vendors }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> CorrelatorResult<CorrelationReport> {
        let seeded = stages::seed_from_addresses(&self.addresses, &self.vendors).await?;
        let attached = stages::attach_page_artifacts(&self.vendors, &self.metadata).await?;
        let merged = stages::merge_on_strong_identity(&self.vendors).await?;
        let scored = stages::compute_risk_scores(&self.vendors).await?;

        let report = CorrelationReport { seeded, attached, merged, scored };
        info!(?report, "🕸️ vendor correlation pass complete");
        Ok(report)
    }
}
