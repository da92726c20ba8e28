// [libs/infra/store/src/repositories/page_repository.rs]
use libsql::params;
use onyx_domain_models::PageRecord;
use tracing::instrument;

use crate::errors::StoreResult;
use crate::repositories::site_repository::parse_ts;
use crate::Store;

pub struct PageRepository {
    store: Store,
}

impl PageRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Inserts or overwrites a page blob: new bytes replace `html_hash` and
    /// `crawl_date`, matching "Upsert on `page_id`" from `spec.md` §3.
    #[instrument(skip(self, page))]
    pub async fn upsert_page(&self, page: &PageRecord) -> StoreResult<()> {
        let connection = self.store.get_connection()?;
        connection
            .execute(
                "INSERT INTO pages (page_id, site_id, url, html_hash, raw_html, crawl_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(page_id) DO UPDATE SET
                    html_hash = excluded.html_hash,
                    raw_html = excluded.raw_html,
                    crawl_date = excluded.crawl_date",
                params![
                    page.page_id.clone(),
                    page.site_id.clone(),
                    page.url.clone(),
                    page.html_hash.clone(),
                    page.raw_html.clone(),
                    page.crawl_date.to_rfc3339(),
                ],
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, page_id: &str) -> StoreResult<Option<PageRecord>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT page_id, site_id, url, html_hash, raw_html, crawl_date
                 FROM pages WHERE page_id = ?1",
                params![page_id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(map_page(&row)?)),
            None => Ok(None),
        }
    }

    /// Pages belonging to a site, ordered most-recent first.
    #[instrument(skip(self))]
    pub async fn list_for_site(&self, site_id: &str, limit: u32) -> StoreResult<Vec<PageRecord>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT page_id, site_id, url, html_hash, raw_html, crawl_date
                 FROM pages WHERE site_id = ?1 ORDER BY crawl_date DESC LIMIT ?2",
                params![site_id.to_string(), limit as i64],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_page(&row)?);
        }
        Ok(out)
    }

    /// Pages that have no corresponding `metadata` row yet — feedstock for
    /// the Page Analyzer's pull loop.
    #[instrument(skip(self))]
    pub async fn pages_without_metadata(&self, limit: u32) -> StoreResult<Vec<PageRecord>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT p.page_id, p.site_id, p.url, p.html_hash, p.raw_html, p.crawl_date
                 FROM pages p
                 LEFT JOIN metadata m ON m.page_id = p.page_id
                 WHERE m.page_id IS NULL
                 LIMIT ?1",
                params![limit as i64],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_page(&row)?);
        }
        Ok(out)
    }
}

fn map_page(row: &libsql::Row) -> StoreResult<PageRecord> {
    let crawl_date: String = row.get(5)?;
    Ok(PageRecord {
        page_id: row.get(0)?,
        site_id: row.get(1)?,
        url: row.get(2)?,
        html_hash: row.get(3)?,
        raw_html: row.get(4)?,
        crawl_date: parse_ts(&crawl_date)?,
    })
}
