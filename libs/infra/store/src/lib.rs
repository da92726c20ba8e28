// [libs/infra/store/src/lib.rs]
/*!
 * =================================================================
 * APARATO: STORE (ESTRATO L3 — PERSISTENCIA SOBERANA)
 * RESPONSABILIDAD: ENTRADA ÚNICA AL SUBSISTEMA DE BASE DE DATOS
 * =================================================================
 */

mod client;
pub mod errors;
pub mod repositories;
mod schema;

pub use client::Store;
pub use errors::{StoreError, StoreResult};
pub use repositories::{
    AddressRepository, ClassificationRepository, LivenessRepository, MetadataRepository,
    PageRepository, SitePage, SiteRepository, TransactionRepository, VendorRepository,
};
