// [libs/infra/store/src/repositories/metadata_repository.rs]
use libsql::params;
use onyx_domain_models::PageMetadata;
use tracing::instrument;

use crate::errors::StoreResult;
use crate::Store;

pub struct MetadataRepository {
    store: Store,
}

impl MetadataRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Conflict-free insert keyed by `page_id` — the Page Analyzer produces
    /// at most one `PageMetadata` per page, enforced by the UNIQUE column.
    #[instrument(skip(self, metadata))]
    pub async fn insert(&self, metadata: &PageMetadata) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "INSERT INTO metadata
                    (metadata_id, page_id, title, meta_tags, emails, pgp_keys,
                     pgp_fingerprints, xmr_addresses, vendor_handles, language)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(page_id) DO NOTHING",
                params![
                    metadata.metadata_id.clone(),
                    metadata.page_id.clone(),
                    metadata.title.clone(),
                    serde_json::to_string(&metadata.meta_tags).unwrap_or_default(),
                    serde_json::to_string(&metadata.emails).unwrap_or_default(),
                    serde_json::to_string(&metadata.pgp_keys).unwrap_or_default(),
                    serde_json::to_string(&metadata.pgp_fingerprints).unwrap_or_default(),
                    serde_json::to_string(&metadata.xmr_addresses).unwrap_or_default(),
                    serde_json::to_string(&metadata.vendor_handles).unwrap_or_default(),
                    metadata.language.clone(),
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    #[instrument(skip(self))]
    pub async fn get_by_page(&self, page_id: &str) -> StoreResult<Option<PageMetadata>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT metadata_id, page_id, title, meta_tags, emails, pgp_keys,
                        pgp_fingerprints, xmr_addresses, vendor_handles, language
                 FROM metadata WHERE page_id = ?1",
                params![page_id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(map_metadata(&row)?)),
            None => Ok(None),
        }
    }

    /// All metadata rows for a site's pages, newest page first — feedstock
    /// for the Correlator's artifact-attachment stage.
    #[instrument(skip(self))]
    pub async fn list_for_site(&self, site_id: &str) -> StoreResult<Vec<PageMetadata>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT m.metadata_id, m.page_id, m.title, m.meta_tags, m.emails, m.pgp_keys,
                        m.pgp_fingerprints, m.xmr_addresses, m.vendor_handles, m.language
                 FROM metadata m
                 JOIN pages p ON p.page_id = m.page_id
                 WHERE p.site_id = ?1
                 ORDER BY p.crawl_date DESC",
                params![site_id.to_string()],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_metadata(&row)?);
        }
        Ok(out)
    }
}

fn map_metadata(row: &libsql::Row) -> StoreResult<PageMetadata> {
    use crate::errors::StoreError;

    let meta_tags: String = row.get(3)?;
    let emails: String = row.get(4)?;
    let pgp_keys: String = row.get(5)?;
    let pgp_fingerprints: String = row.get(6)?;
    let xmr_addresses: String = row.get(7)?;
    let vendor_handles: String = row.get(8)?;

    Ok(PageMetadata {
        metadata_id: row.get(0)?,
        page_id: row.get(1)?,
        title: row.get(2)?,
        meta_tags: serde_json::from_str(&meta_tags)
            .map_err(|e| StoreError::MappingError(format!("meta_tags: {e}")))?,
        emails: serde_json::from_str(&emails)
            .map_err(|e| StoreError::MappingError(format!("emails: {e}")))?,
        pgp_keys: serde_json::from_str(&pgp_keys)
            .map_err(|e| StoreError::MappingError(format!("pgp_keys: {e}")))?,
        pgp_fingerprints: serde_json::from_str(&pgp_fingerprints)
            .map_err(|e| StoreError::MappingError(format!("pgp_fingerprints: {e}")))?,
        xmr_addresses: serde_json::from_str(&xmr_addresses)
            .map_err(|e| StoreError::MappingError(format!("xmr_addresses: {e}")))?,
        vendor_handles: serde_json::from_str(&vendor_handles)
            .map_err(|e| StoreError::MappingError(format!("vendor_handles: {e}")))?,
        language: row.get(9)?,
    })
}
