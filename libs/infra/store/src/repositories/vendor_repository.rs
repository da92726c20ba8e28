// [libs/infra/store/src/repositories/vendor_repository.rs]
use libsql::params;
use onyx_domain_models::{ArtifactType, Vendor, VendorArtifact};
use std::str::FromStr;
use tracing::instrument;

use crate::errors::{StoreError, StoreResult};
use crate::repositories::site_repository::parse_ts;
use crate::Store;

pub struct VendorRepository {
    store: Store,
}

impl VendorRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Upserts a vendor row, extending `last_seen` forward on conflict and
    /// never regressing `first_seen`.
    #[instrument(skip(self, vendor))]
    pub async fn upsert_vendor(&self, vendor: &Vendor) -> StoreResult<()> {
        let connection = self.store.get_connection()?;
        connection
            .execute(
                "INSERT INTO vendors (vendor_id, vendor_name, risk_score, first_seen, last_seen)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(vendor_id) DO UPDATE SET
                    last_seen = MAX(last_seen, excluded.last_seen)",
                params![
                    vendor.vendor_id.clone(),
                    vendor.vendor_name.clone(),
                    vendor.risk_score as i64,
                    vendor.first_seen.to_rfc3339(),
                    vendor.last_seen.to_rfc3339(),
                ],
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(&self, vendor_id: &str) -> StoreResult<Option<Vendor>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT vendor_id, vendor_name, risk_score, first_seen, last_seen
                 FROM vendors WHERE vendor_id = ?1",
                params![vendor_id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(map_vendor(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_risk_score(&self, vendor_id: &str, risk_score: u8) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "UPDATE vendors SET risk_score = ?1 WHERE vendor_id = ?2",
                params![risk_score as i64, vendor_id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Conflict-free insert keyed by `artifact_id`.
    #[instrument(skip(self, artifact))]
    pub async fn insert_artifact(&self, artifact: &VendorArtifact) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "INSERT INTO vendor_artifacts
                    (artifact_id, vendor_id, artifact_type, artifact_value, artifact_hash,
                     confidence, site_id, page_id, first_seen, last_seen)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(artifact_id) DO NOTHING",
                params![
                    artifact.artifact_id.clone(),
                    artifact.vendor_id.clone(),
                    artifact.artifact_type.to_string(),
                    artifact.artifact_value.clone(),
                    artifact.artifact_hash.clone(),
                    artifact.confidence as i64,
                    artifact.site_id.clone(),
                    artifact.page_id.clone(),
                    artifact.first_seen.to_rfc3339(),
                    artifact.last_seen.to_rfc3339(),
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Reassigns every artifact owned by `from_vendor_id` to
    /// `to_vendor_id` — the merge operation of the correlation pipeline's
    /// stage 3. Callers choose `to_vendor_id` as the lexicographically
    /// smallest of the colliding vendor ids, per `SPEC_FULL.md` §9.
    #[instrument(skip(self))]
    pub async fn reassign_artifacts(&self, from_vendor_id: &str, to_vendor_id: &str) -> StoreResult<u64> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "UPDATE vendor_artifacts SET vendor_id = ?1 WHERE vendor_id = ?2",
                params![to_vendor_id.to_string(), from_vendor_id.to_string()],
            )
            .await?;
        Ok(changed)
    }

    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, vendor_id: &str) -> StoreResult<()> {
        let connection = self.store.get_connection()?;
        connection
            .execute(
                "DELETE FROM vendors WHERE vendor_id = ?1",
                params![vendor_id.to_string()],
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn artifacts_for_vendor(&self, vendor_id: &str) -> StoreResult<Vec<VendorArtifact>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT artifact_id, vendor_id, artifact_type, artifact_value, artifact_hash,
                        confidence, site_id, page_id, first_seen, last_seen
                 FROM vendor_artifacts WHERE vendor_id = ?1",
                params![vendor_id.to_string()],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_artifact(&row)?);
        }
        Ok(out)
    }

    /// Every vendor that shares an `artifact_hash` of a "strong identity"
    /// type (pgp, xmr) with `vendor_id`, excluding `vendor_id` itself —
    /// the merge pipeline's collision search.
    #[instrument(skip(self))]
    pub async fn strong_identity_collisions(&self, vendor_id: &str) -> StoreResult<Vec<String>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT DISTINCT b.vendor_id
                 FROM vendor_artifacts a
                 JOIN vendor_artifacts b ON a.artifact_hash = b.artifact_hash
                 WHERE a.vendor_id = ?1
                   AND b.vendor_id != ?1
                   AND a.artifact_type IN ('pgp', 'xmr')
                   AND b.artifact_type IN ('pgp', 'xmr')",
                params![vendor_id.to_string()],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row.get::<String>(0)?);
        }
        Ok(out)
    }

    #[instrument(skip(self))]
    pub async fn all_vendor_ids(&self) -> StoreResult<Vec<String>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection.query("SELECT vendor_id FROM vendors", ()).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row.get::<String>(0)?);
        }
        Ok(out)
    }
}

fn map_vendor(row: &libsql::Row) -> StoreResult<Vendor> {
    let risk_score: i64 = row.get(2)?;
    let first_seen: String = row.get(3)?;
    let last_seen: String = row.get(4)?;

    Ok(Vendor {
        vendor_id: row.get(0)?,
        vendor_name: row.get(1)?,
        risk_score: risk_score as u8,
        first_seen: parse_ts(&first_seen)?,
        last_seen: parse_ts(&last_seen)?,
    })
}

fn map_artifact(row: &libsql::Row) -> StoreResult<VendorArtifact> {
    let artifact_type: String = row.get(2)?;
    let confidence: i64 = row.get(5)?;
    let first_seen: String = row.get(8)?;
    let last_seen: String = row.get(9)?;

    Ok(VendorArtifact {
        artifact_id: row.get(0)?,
        vendor_id: row.get(1)?,
        artifact_type: ArtifactType::from_str(&artifact_type).map_err(StoreError::MappingError)?,
        artifact_value: row.get(3)?,
        artifact_hash: row.get(4)?,
        confidence: confidence as u8,
        site_id: row.get(6)?,
        page_id: row.get(7)?,
        first_seen: parse_ts(&first_seen)?,
        last_seen: parse_ts(&last_seen)?,
    })
}
