// [libs/domain/models/src/page.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{canonical, sha256_hex, sha256_hex_bytes, site_root};

/// One fetched HTML document at a full URL. `html_hash` is always derived
/// from `raw_html` at construction time — the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_id: String,
    pub site_id: String,
    pub url: String,
    pub html_hash: String,
    #[serde(with = "raw_html_as_hex")]
    pub raw_html: Vec<u8>,
    pub crawl_date: DateTime<Utc>,
}

impl PageRecord {
    /// `html_hash` is computed here, from `raw_html`, not accepted as an
    /// argument — this is the invariant `html_hash = hash(raw_html)`.
    pub fn new(url: &str, raw_html: Vec<u8>) -> Self {
        let full = canonical(url);
        let root = site_root(&full);
        Self {
            page_id: sha256_hex(&full),
            site_id: sha256_hex(&root),
            url: full,
            html_hash: sha256_hex_bytes(&raw_html),
            raw_html,
            crawl_date: Utc::now(),
        }
    }
}

mod raw_html_as_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let hex_str = String::deserialize(d)?;
        hex::decode(hex_str).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_hash_matches_raw_bytes() {
        let page = PageRecord::new("http://example.onion/a/", b"<html></html>".to_vec());
        assert_eq!(
            page.html_hash,
            crate::identity::sha256_hex_bytes(b"<html></html>")
        );
    }

    #[test]
    fn html_hash_is_computed_over_raw_bytes_not_a_lossy_utf8_decode() {
        let raw = vec![0xff, 0xfe, 0x00, 0xd8, 0x41];
        let page = PageRecord::new("http://example.onion/a", raw.clone());
        assert_eq!(page.html_hash, crate::identity::sha256_hex_bytes(&raw));
        assert_ne!(
            page.html_hash,
            crate::identity::sha256_hex(&String::from_utf8_lossy(&raw))
        );
    }

    #[test]
    fn site_id_matches_hash_of_site_root() {
        let page = PageRecord::new("http://EXAMPLE.onion/a/b", b"x".to_vec());
        assert_eq!(
            page.site_id,
            crate::identity::sha256_hex(&crate::identity::site_root("http://example.onion/a/b"))
        );
    }
}
