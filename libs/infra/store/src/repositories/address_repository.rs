// [libs/infra/store/src/repositories/address_repository.rs]
use libsql::params;
use onyx_domain_models::BitcoinAddress;
use tracing::instrument;

use crate::errors::StoreResult;
use crate::repositories::site_repository::parse_ts;
use crate::Store;

pub struct AddressRepository {
    store: Store,
}

impl AddressRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Conflict-free insert keyed by `address_id` (the address's own hash) —
    /// the same Bitcoin address observed again on the same page is a no-op.
    #[instrument(skip(self, address))]
    pub async fn insert(&self, address: &BitcoinAddress) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "INSERT INTO bitcoin_addresses
                    (address_id, address, site_id, page_id, valid, detected_at, tx_analyzed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(address_id) DO NOTHING",
                params![
                    address.address_id.clone(),
                    address.address.clone(),
                    address.site_id.clone(),
                    address.page_id.clone(),
                    address.valid as i64,
                    address.detected_at.to_rfc3339(),
                    address.tx_analyzed as i64,
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Atomically flips `tx_analyzed` so two Transaction Worker replicas
    /// cannot double-process the same address.
    #[instrument(skip(self))]
    pub async fn mark_tx_analyzed(&self, address_id: &str) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "UPDATE bitcoin_addresses SET tx_analyzed = 1
                 WHERE address_id = ?1 AND tx_analyzed = 0",
                params![address_id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Valid, not-yet-analyzed addresses — the Transaction Worker's pull
    /// batch, oldest `detected_at` first.
    #[instrument(skip(self))]
    pub async fn pending_for_analysis(&self, limit: u32) -> StoreResult<Vec<BitcoinAddress>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT address_id, address, site_id, page_id, valid, detected_at, tx_analyzed
                 FROM bitcoin_addresses
                 WHERE valid = 1 AND tx_analyzed = 0
                 ORDER BY detected_at ASC
                 LIMIT ?1",
                params![limit as i64],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_address(&row)?);
        }
        Ok(out)
    }

    /// Every valid address in the store, regardless of site — the
    /// Correlator's stage-1 seed walks this list in full on every run
    /// (the stage is idempotent, so re-seeding an already-seeded address
    /// is a harmless conflict-free no-op).
    #[instrument(skip(self))]
    pub async fn all_valid(&self) -> StoreResult<Vec<BitcoinAddress>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT address_id, address, site_id, page_id, valid, detected_at, tx_analyzed
                 FROM bitcoin_addresses WHERE valid = 1",
                (),
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_address(&row)?);
        }
        Ok(out)
    }

    /// All valid addresses belonging to a site — used by the Correlator's
    /// vendor-seeding stage.
    #[instrument(skip(self))]
    pub async fn valid_for_site(&self, site_id: &str) -> StoreResult<Vec<BitcoinAddress>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT address_id, address, site_id, page_id, valid, detected_at, tx_analyzed
                 FROM bitcoin_addresses WHERE site_id = ?1 AND valid = 1",
                params![site_id.to_string()],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_address(&row)?);
        }
        Ok(out)
    }
}

fn map_address(row: &libsql::Row) -> StoreResult<BitcoinAddress> {
    let valid: i64 = row.get(4)?;
    let detected_at: String = row.get(5)?;
    let tx_analyzed: i64 = row.get(6)?;

    Ok(BitcoinAddress {
        address_id: row.get(0)?,
        address: row.get(1)?,
        site_id: row.get(2)?,
        page_id: row.get(3)?,
        valid: valid != 0,
        detected_at: parse_ts(&detected_at)?,
        tx_analyzed: tx_analyzed != 0,
    })
}
