// [libs/infra/store/src/repositories/classification_repository.rs]
use libsql::params;
use onyx_domain_models::Classification;
use tracing::instrument;

use crate::errors::StoreResult;
use crate::repositories::site_repository::parse_ts;
use crate::Store;

pub struct ClassificationRepository {
    store: Store,
}

impl ClassificationRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Insert-or-replace keyed by `(site_id, model_name, model_version)` —
    /// a re-run of the same model version on the same site supersedes its
    /// previous verdict rather than accumulating duplicates.
    #[instrument(skip(self, classification))]
    pub async fn upsert(&self, classification: &Classification) -> StoreResult<()> {
        let connection = self.store.get_connection()?;
        connection
            .execute(
                "INSERT INTO site_classification
                    (site_id, model_name, model_version, predicted_keyword, confidence, analysed_at, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(site_id, model_name, model_version) DO UPDATE SET
                    predicted_keyword = excluded.predicted_keyword,
                    confidence = excluded.confidence,
                    analysed_at = excluded.analysed_at,
                    status = excluded.status",
                params![
                    classification.site_id.clone(),
                    classification.model_name.clone(),
                    classification.model_version.clone(),
                    classification.predicted_keyword.clone(),
                    classification.confidence,
                    classification.analysed_at.to_rfc3339(),
                    classification.status.clone(),
                ],
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn latest_for_site(&self, site_id: &str) -> StoreResult<Option<Classification>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT site_id, model_name, model_version, predicted_keyword, confidence, analysed_at, status
                 FROM site_classification WHERE site_id = ?1
                 ORDER BY analysed_at DESC LIMIT 1",
                params![site_id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(map_classification(&row)?)),
            None => Ok(None),
        }
    }
}

fn map_classification(row: &libsql::Row) -> StoreResult<Classification> {
    let analysed_at: String = row.get(5)?;
    Ok(Classification {
        site_id: row.get(0)?,
        model_name: row.get(1)?,
        model_version: row.get(2)?,
        predicted_keyword: row.get(3)?,
        confidence: row.get(4)?,
        analysed_at: parse_ts(&analysed_at)?,
        status: row.get(6)?,
    })
}
