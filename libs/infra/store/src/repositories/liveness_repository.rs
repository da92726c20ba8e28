// [libs/infra/store/src/repositories/liveness_repository.rs]
use libsql::params;
use onyx_domain_models::{Liveness, SiteStatus};
use tracing::instrument;

use crate::errors::{StoreError, StoreResult};
use crate::Store;

#[derive(Clone)]
pub struct LivenessRepository {
    store: Store,
}

impl LivenessRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Records a liveness observation and folds it into `onion_sites` in a
    /// single transaction: the observed `status` becomes `current_status`
    /// and `check_time` becomes `last_seen`, so a reader never observes the
    /// liveness log and the site table disagree.
    #[instrument(skip(self, observation))]
    pub async fn record(&self, observation: &Liveness) -> StoreResult<()> {
        let connection = self.store.get_connection()?;
        let tx = connection
            .transaction()
            .await
            .map_err(|e| StoreError::TransactionError(e.to_string()))?;

        tx.execute(
            "INSERT INTO site_liveness (liveness_id, site_id, status, response_time, check_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                observation.liveness_id.clone(),
                observation.site_id.clone(),
                observation.status.to_string(),
                observation.response_time,
                observation.check_time.to_rfc3339(),
            ],
        )
        .await
        .map_err(|e| StoreError::TransactionError(e.to_string()))?;

        tx.execute(
            "UPDATE onion_sites SET current_status = ?1, last_seen = ?2 WHERE site_id = ?3",
            params![
                observation.status.to_string(),
                observation.check_time.to_rfc3339(),
                observation.site_id.clone(),
            ],
        )
        .await
        .map_err(|e| StoreError::TransactionError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionError(e.to_string()))?;

        Ok(())
    }

    /// Liveness history for a site, most recent check first.
    #[instrument(skip(self))]
    pub async fn history_for_site(&self, site_id: &str, limit: u32) -> StoreResult<Vec<Liveness>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT liveness_id, site_id, status, response_time, check_time
                 FROM site_liveness WHERE site_id = ?1
                 ORDER BY check_time DESC LIMIT ?2",
                params![site_id.to_string(), limit as i64],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_liveness(&row)?);
        }
        Ok(out)
    }
}

fn map_liveness(row: &libsql::Row) -> StoreResult<Liveness> {
    use crate::repositories::site_repository::parse_ts;
    use std::str::FromStr;

    let status: String = row.get(2)?;
    let check_time: String = row.get(4)?;

    Ok(Liveness {
        liveness_id: row.get(0)?,
        site_id: row.get(1)?,
        status: SiteStatus::from_str(&status).map_err(StoreError::MappingError)?,
        response_time: row.get(3)?,
        check_time: parse_ts(&check_time)?,
    })
}
