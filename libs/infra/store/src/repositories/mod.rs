// [libs/infra/store/src/repositories/mod.rs]
pub mod address_repository;
pub mod classification_repository;
pub mod liveness_repository;
pub mod metadata_repository;
pub mod page_repository;
pub mod site_repository;
pub mod transaction_repository;
pub mod vendor_repository;

pub use address_repository::AddressRepository;
pub use classification_repository::ClassificationRepository;
pub use liveness_repository::LivenessRepository;
pub use metadata_repository::MetadataRepository;
pub use page_repository::PageRepository;
pub use site_repository::{SitePage, SiteRepository};
pub use transaction_repository::TransactionRepository;
pub use vendor_repository::VendorRepository;
