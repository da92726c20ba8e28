// [libs/infra/store/src/repositories/site_repository.rs]
use chrono::{DateTime, Utc};
use libsql::params;
use onyx_domain_models::{SiteRecord, SiteStatus};
use std::str::FromStr;
use tracing::instrument;

use crate::errors::{StoreError, StoreResult};
use crate::Store;

#[derive(Clone)]
pub struct SiteRepository {
    store: Store,
}

/// Keyset pagination cursor: `(last_seen, site_id)` of the last row seen by
/// the caller, ordered `(last_seen DESC, site_id DESC)` per `spec.md` §4.2.
#[derive(Debug, Clone)]
pub struct SitePage {
    pub sites: Vec<SiteRecord>,
    pub next_cursor: Option<(DateTime<Utc>, String)>,
}

impl SiteRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Inserts the site if `site_id` is absent; no-ops on conflict. Returns
    /// whether a new row was inserted — callers (LinkManager, Seed
    /// Collector) use this to decide whether to queue the site.
    #[instrument(skip(self, site))]
    pub async fn upsert_site(&self, site: &SiteRecord) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "INSERT INTO onion_sites
                    (site_id, url, source, keyword, current_status, first_seen, last_seen)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(site_id) DO NOTHING",
                params![
                    site.site_id.clone(),
                    site.url.clone(),
                    site.source.clone(),
                    site.keyword.clone(),
                    site.current_status.to_string(),
                    site.first_seen.to_rfc3339(),
                    site.last_seen.to_rfc3339(),
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Writes `current_status` and `last_seen` for a known `site_id`.
    /// Returns whether a row existed to update.
    #[instrument(skip(self))]
    pub async fn update_status(&self, site_id: &str, status: SiteStatus) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let now = Utc::now().to_rfc3339();
        let changed = connection
            .execute(
                "UPDATE onion_sites SET current_status = ?1, last_seen = ?2 WHERE site_id = ?3",
                params![status.to_string(), now, site_id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Updates the category keyword for a known `site_id` (Classifier).
    #[instrument(skip(self))]
    pub async fn update_keyword(&self, site_id: &str, keyword: &str) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "UPDATE onion_sites SET keyword = ?1 WHERE site_id = ?2",
                params![keyword.to_string(), site_id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, site_id: &str) -> StoreResult<Option<SiteRecord>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT site_id, url, source, keyword, current_status, first_seen, last_seen
                 FROM onion_sites WHERE site_id = ?1",
                params![site_id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(map_site(&row)?)),
            None => Ok(None),
        }
    }

    /// Every registered site, in no particular order — the Liveness
    /// Tracker's full-sweep feedstock (spec.md §4.10: "reads every
    /// SiteRecord").
    #[instrument(skip(self))]
    pub async fn all_sites(&self) -> StoreResult<Vec<SiteRecord>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT site_id, url, source, keyword, current_status, first_seen, last_seen
                 FROM onion_sites",
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_site(&row)?);
        }
        Ok(out)
    }

    /// Site roots whose `last_seen` is null or older than `older_than` —
    /// used by LinkManager's startup reload (freshness horizon, default 6h).
    #[instrument(skip(self))]
    pub async fn stale_sites(&self, older_than: DateTime<Utc>) -> StoreResult<Vec<SiteRecord>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT site_id, url, source, keyword, current_status, first_seen, last_seen
                 FROM onion_sites WHERE last_seen < ?1",
                params![older_than.to_rfc3339()],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_site(&row)?);
        }
        Ok(out)
    }

    /// Keyset-paginated site listing, ordered `(last_seen DESC, site_id DESC)`,
    /// optionally filtered by `current_status` and/or `keyword`.
    #[instrument(skip(self))]
    pub async fn list_sites(
        &self,
        status: Option<SiteStatus>,
        keyword: Option<&str>,
        cursor: Option<(DateTime<Utc>, String)>,
        limit: u32,
    ) -> StoreResult<SitePage> {
        let connection = self.store.get_connection()?;

        let mut sql = String::from(
            "SELECT site_id, url, source, keyword, current_status, first_seen, last_seen
             FROM onion_sites WHERE 1 = 1",
        );
        let mut binds: Vec<libsql::Value> = Vec::new();

        if let Some(s) = status {
            sql.push_str(" AND current_status = ?");
            binds.push(libsql::Value::Text(s.to_string()));
        }
        if let Some(k) = keyword {
            sql.push_str(" AND keyword = ?");
            binds.push(libsql::Value::Text(k.to_string()));
        }
        if let Some((last_seen, site_id)) = &cursor {
            sql.push_str(" AND (last_seen < ? OR (last_seen = ? AND site_id < ?))");
            binds.push(libsql::Value::Text(last_seen.to_rfc3339()));
            binds.push(libsql::Value::Text(last_seen.to_rfc3339()));
            binds.push(libsql::Value::Text(site_id.clone()));
        }
        sql.push_str(" ORDER BY last_seen DESC, site_id DESC LIMIT ?");
        binds.push(libsql::Value::Integer(limit as i64));

        let mut rows = connection.query(&sql, binds).await?;
        let mut sites = Vec::new();
        while let Some(row) = rows.next().await? {
            sites.push(map_site(&row)?);
        }

        let next_cursor = sites
            .last()
            .map(|s| (s.last_seen, s.site_id.clone()));

        Ok(SitePage { sites, next_cursor })
    }
}

fn map_site(row: &libsql::Row) -> StoreResult<SiteRecord> {
    let current_status: String = row.get(4)?;
    let first_seen: String = row.get(5)?;
    let last_seen: String = row.get(6)?;

    Ok(SiteRecord {
        site_id: row.get(0)?,
        url: row.get(1)?,
        source: row.get(2)?,
        keyword: row.get(3)?,
        current_status: SiteStatus::from_str(&current_status)
            .map_err(StoreError::MappingError)?,
        first_seen: parse_ts(&first_seen)?,
        last_seen: parse_ts(&last_seen)?,
    })
}

pub(crate) fn parse_ts(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::MappingError(format!("bad timestamp '{value}': {e}")))
}
