// [libs/domain/models/src/address.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::sha256_hex;

/// A Bitcoin address candidate observed on a page. `valid` reflects whether
/// the address passed Base58Check or Bech32 checksum validation at
/// extraction time; invalid candidates are still persisted (per
/// `SPEC_FULL.md` §9) but every downstream reader filters on `valid = true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitcoinAddress {
    pub address_id: String,
    pub address: String,
    pub site_id: String,
    pub page_id: String,
    pub valid: bool,
    pub detected_at: DateTime<Utc>,
    pub tx_analyzed: bool,
}

impl BitcoinAddress {
    pub fn new(address: &str, site_id: impl Into<String>, page_id: impl Into<String>, valid: bool) -> Self {
        Self {
            address_id: sha256_hex(address),
            address: address.to_string(),
            site_id: site_id.into(),
            page_id: page_id.into(),
            valid,
            detected_at: Utc::now(),
            tx_analyzed: false,
        }
    }
}
