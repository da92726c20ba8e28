// [libs/domain/models/src/transaction.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a single transaction summary row relative to the watched
/// address: did the address receive (`Inbound`) or spend (`Outbound`)?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxDirection {
    Inbound,
    Outbound,
}

impl fmt::Display for TxDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TxDirection::Inbound => "Inbound",
            TxDirection::Outbound => "Outbound",
        })
    }
}

impl std::str::FromStr for TxDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Inbound" => Ok(TxDirection::Inbound),
            "Outbound" => Ok(TxDirection::Outbound),
            other => Err(format!("unknown tx direction: {other}")),
        }
    }
}

/// A single relevant output (or input) on a watched address, with the
/// transaction's overall fan-in/fan-out and the derived mixer heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub tx_id: String,
    pub address_id: String,
    pub direction: TxDirection,
    pub amount: f64,
    pub timestamp: Option<DateTime<Utc>>,
    pub fan_in: u32,
    pub fan_out: u32,
    pub is_mixer: bool,
}

impl TransactionSummary {
    /// `is_mixer` is always derived here from `(fan_in, fan_out)` — callers
    /// never set it independently, which is the property tested in
    /// `SPEC_FULL.md` §8 ("is_mixer ↔ (fan_in ≥ 10 ∧ fan_out ≥ 10)").
    pub fn new(
        tx_id: impl Into<String>,
        address_id: impl Into<String>,
        direction: TxDirection,
        amount: f64,
        timestamp: Option<DateTime<Utc>>,
        fan_in: u32,
        fan_out: u32,
    ) -> Self {
        Self {
            tx_id: tx_id.into(),
            address_id: address_id.into(),
            direction,
            amount,
            timestamp,
            fan_in,
            fan_out,
            is_mixer: fan_in >= 10 && fan_out >= 10,
        }
    }
}

/// One input→output flow edge as reported by the blockchain explorer.
/// Uniqueness is on the full `(tx_id, from_address, to_address)` tuple, not
/// on `tx_id` alone, since a transaction may carry many edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEdge {
    pub tx_id: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: f64,
    pub timestamp: Option<DateTime<Utc>>,
}
