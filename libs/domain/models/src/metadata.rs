// [libs/domain/models/src/metadata.rs]
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::identity::sha256_hex;

/// Page-level metadata and lightweight artifact observations extracted by
/// the Page Analyzer. Sets are modeled as `BTreeSet` for deterministic
/// iteration order (stable test fixtures, stable JSON rendering).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub metadata_id: String,
    pub page_id: String,
    pub title: Option<String>,
    pub meta_tags: BTreeMap<String, String>,
    pub emails: BTreeSet<String>,
    pub pgp_keys: BTreeSet<String>,
    pub pgp_fingerprints: BTreeSet<String>,
    pub xmr_addresses: BTreeSet<String>,
    pub vendor_handles: BTreeSet<String>,
    pub language: String,
}

impl PageMetadata {
    pub fn new(page_id: impl Into<String>) -> Self {
        let page_id = page_id.into();
        Self {
            metadata_id: sha256_hex(&format!("metadata:{page_id}")),
            page_id,
            language: "unknown".to_string(),
            ..Default::default()
        }
    }
}
