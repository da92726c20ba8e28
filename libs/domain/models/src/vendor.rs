// [libs/domain/models/src/vendor.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::sha256_hex;

/// A synthetic identity aggregating artifacts believed to belong to one
/// onion-market operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub vendor_id: String,
    pub vendor_name: String,
    pub risk_score: u8,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Vendor {
    /// Seeds a vendor from a Bitcoin address — `vendor_id` is `hash(address)`
    /// until a merge (§4.9 stage 3) reassigns its artifacts to a canonical
    /// vendor chosen from a set of colliding identities.
    pub fn seed_from_address(address: &str) -> Self {
        let now = Utc::now();
        Self {
            vendor_id: sha256_hex(address),
            vendor_name: generate_vendor_name(address),
            risk_score: 0,
            first_seen: now,
            last_seen: now,
        }
    }
}

/// Deterministic, human-legible label derived from the seeding address —
/// mirrors the original implementation's `generate_vendor_name` utility
/// without depending on it: `Vendor-<first 8 hex chars of hash(address)>`.
pub fn generate_vendor_name(address: &str) -> String {
    let digest = sha256_hex(address);
    format!("Vendor-{}", &digest[..8])
}

/// The type of identity signal an artifact carries. Confidence weights are
/// fixed per type (§4.9 stage 2): btc=90, pgp=80, xmr=70, email=50, handle=40.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactType {
    Btc,
    Pgp,
    Xmr,
    Email,
    Handle,
}

impl ArtifactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Btc => "btc",
            ArtifactType::Pgp => "pgp",
            ArtifactType::Xmr => "xmr",
            ArtifactType::Email => "email",
            ArtifactType::Handle => "handle",
        }
    }

    /// Base confidence for a freshly observed artifact of this type.
    pub fn base_confidence(&self) -> u8 {
        match self {
            ArtifactType::Btc => 90,
            ArtifactType::Pgp => 80,
            ArtifactType::Xmr => 70,
            ArtifactType::Email => 50,
            ArtifactType::Handle => 40,
        }
    }

    /// Whether this artifact type is a "strong" identity key allowed to
    /// drive vendor merges (§4.9 stage 3: pgp and, optionally, xmr).
    pub fn is_strong_identity(&self) -> bool {
        matches!(self, ArtifactType::Pgp | ArtifactType::Xmr)
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArtifactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "btc" => Ok(ArtifactType::Btc),
            "pgp" => Ok(ArtifactType::Pgp),
            "xmr" => Ok(ArtifactType::Xmr),
            "email" => Ok(ArtifactType::Email),
            "handle" => Ok(ArtifactType::Handle),
            other => Err(format!("unknown artifact type: {other}")),
        }
    }
}

/// A single typed identity observation, attached to the page/site it was
/// seen on and owned by exactly one vendor (subject to later merges).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorArtifact {
    pub artifact_id: String,
    pub vendor_id: String,
    pub artifact_type: ArtifactType,
    pub artifact_value: String,
    pub artifact_hash: String,
    pub confidence: u8,
    pub site_id: String,
    pub page_id: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl VendorArtifact {
    pub fn new(
        vendor_id: impl Into<String>,
        artifact_type: ArtifactType,
        artifact_value: impl Into<String>,
        site_id: impl Into<String>,
        page_id: impl Into<String>,
    ) -> Self {
        let artifact_value = artifact_value.into();
        let page_id = page_id.into();
        let now = Utc::now();
        Self {
            artifact_id: sha256_hex(&format!("{}:{}:{}", artifact_type.as_str(), artifact_value, page_id)),
            vendor_id: vendor_id.into(),
            confidence: artifact_type.base_confidence(),
            artifact_hash: sha256_hex(&format!("{}:{}", artifact_type.as_str(), artifact_value)),
            artifact_type,
            artifact_value,
            site_id: site_id.into(),
            page_id,
            first_seen: now,
            last_seen: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_id_is_keyed_by_type_value_and_page() {
        let a = VendorArtifact::new("v1", ArtifactType::Btc, "1A1zP1", "s1", "p1");
        let b = VendorArtifact::new("v2", ArtifactType::Btc, "1A1zP1", "s1", "p1");
        assert_eq!(a.artifact_id, b.artifact_id, "artifact id must not depend on vendor_id");
    }

    #[test]
    fn artifact_hash_ignores_page() {
        let a = VendorArtifact::new("v1", ArtifactType::Pgp, "BLOCK", "s1", "p1");
        let b = VendorArtifact::new("v1", ArtifactType::Pgp, "BLOCK", "s2", "p2");
        assert_eq!(a.artifact_hash, b.artifact_hash);
    }
}
