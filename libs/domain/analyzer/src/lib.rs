// [libs/domain/analyzer/src/lib.rs]
/*!
 * =================================================================
 * APARATO: PAGE ANALYZER (ESTRATO L5 — ENRIQUECIMIENTO)
 * RESPONSABILIDAD: EXTRACCIÓN DE METADATOS Y ARTEFACTOS BITCOIN
 * =================================================================
 */

pub mod bitcoin;
pub mod errors;
pub mod extraction;
pub mod worker;

pub use bitcoin::{extract_addresses, validate_base58check, validate_bech32, AddressCandidate};
pub use errors::{AnalyzerError, AnalyzerResult};
pub use extraction::{extract_metadata, strip_scripts_and_styles};
pub use worker::{AnalyzerConfig, PageAnalyzer};
