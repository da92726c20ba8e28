// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DOMAIN MODELS BARREL
 * RESPONSABILIDAD: EXPOSICIÓN DE TIPOS SOBERANOS DEL PIPELINE ONYX
 * =================================================================
 */

pub mod address;
pub mod classification;
pub mod identity;
pub mod liveness;
pub mod metadata;
pub mod page;
pub mod site;
pub mod transaction;
pub mod vendor;

pub use address::BitcoinAddress;
pub use classification::Classification;
pub use liveness::Liveness;
pub use metadata::PageMetadata;
pub use page::PageRecord;
pub use site::{SiteRecord, SiteStatus};
pub use transaction::{TransactionEdge, TransactionSummary, TxDirection};
pub use vendor::{ArtifactType, Vendor, VendorArtifact};
