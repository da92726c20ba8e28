// [libs/infra/store/src/repositories/transaction_repository.rs]
use libsql::params;
use onyx_domain_models::{TransactionEdge, TransactionSummary, TxDirection};
use std::str::FromStr;
use tracing::instrument;

use crate::errors::{StoreError, StoreResult};
use crate::repositories::site_repository::parse_ts;
use crate::Store;

pub struct TransactionRepository {
    store: Store,
}

impl TransactionRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Conflict-free insert keyed on `(tx_id, address_id, direction)` — a
    /// watched address can appear as both the Inbound and Outbound side of
    /// the same transaction, so `tx_id` alone is not a unique key.
    #[instrument(skip(self, summary))]
    pub async fn insert_summary(&self, summary: &TransactionSummary) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "INSERT INTO transactions
                    (tx_id, address_id, direction, amount, timestamp, fan_in, fan_out, is_mixer)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(tx_id, address_id, direction) DO NOTHING",
                params![
                    summary.tx_id.clone(),
                    summary.address_id.clone(),
                    summary.direction.to_string(),
                    summary.amount,
                    summary.timestamp.map(|t| t.to_rfc3339()),
                    summary.fan_in as i64,
                    summary.fan_out as i64,
                    summary.is_mixer as i64,
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    /// Conflict-free insert keyed on the edge's full `(tx_id, from_address,
    /// to_address)` tuple.
    #[instrument(skip(self, edge))]
    pub async fn insert_edge(&self, edge: &TransactionEdge) -> StoreResult<bool> {
        let connection = self.store.get_connection()?;
        let changed = connection
            .execute(
                "INSERT INTO bitcoin_transaction_edges
                    (tx_id, from_address, to_address, amount, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(tx_id, from_address, to_address) DO NOTHING",
                params![
                    edge.tx_id.clone(),
                    edge.from_address.clone(),
                    edge.to_address.clone(),
                    edge.amount,
                    edge.timestamp.map(|t| t.to_rfc3339()),
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    #[instrument(skip(self))]
    pub async fn summaries_for_address(&self, address_id: &str) -> StoreResult<Vec<TransactionSummary>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT tx_id, address_id, direction, amount, timestamp, fan_in, fan_out, is_mixer
                 FROM transactions WHERE address_id = ?1",
                params![address_id.to_string()],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_summary(&row)?);
        }
        Ok(out)
    }

    /// Edges with `from_address` or `to_address` equal to `address` —
    /// the Correlator/graph walk's one-hop frontier.
    #[instrument(skip(self))]
    pub async fn edges_touching(&self, address: &str) -> StoreResult<Vec<TransactionEdge>> {
        let connection = self.store.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT tx_id, from_address, to_address, amount, timestamp
                 FROM bitcoin_transaction_edges
                 WHERE from_address = ?1 OR to_address = ?1",
                params![address.to_string()],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_edge(&row)?);
        }
        Ok(out)
    }
}

fn map_summary(row: &libsql::Row) -> StoreResult<TransactionSummary> {
    let direction: String = row.get(2)?;
    let timestamp: Option<String> = row.get(4)?;
    let fan_in: i64 = row.get(5)?;
    let fan_out: i64 = row.get(6)?;
    let is_mixer: i64 = row.get(7)?;

    Ok(TransactionSummary {
        tx_id: row.get(0)?,
        address_id: row.get(1)?,
        direction: TxDirection::from_str(&direction).map_err(StoreError::MappingError)?,
        amount: row.get(3)?,
        timestamp: timestamp.map(|t| parse_ts(&t)).transpose()?,
        fan_in: fan_in as u32,
        fan_out: fan_out as u32,
        is_mixer: is_mixer != 0,
    })
}

fn map_edge(row: &libsql::Row) -> StoreResult<TransactionEdge> {
    let timestamp: Option<String> = row.get(4)?;
    Ok(TransactionEdge {
        tx_id: row.get(0)?,
        from_address: row.get(1)?,
        to_address: row.get(2)?,
        amount: row.get(3)?,
        timestamp: timestamp.map(|t| parse_ts(&t)).transpose()?,
    })
}
