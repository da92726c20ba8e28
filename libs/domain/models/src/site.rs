// [libs/domain/models/src/site.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::{sha256_hex, site_root};

/// Status of a site as last observed by the Crawler or Liveness Tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteStatus {
    Alive,
    Dead,
    Timeout,
    Error,
    Unknown,
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SiteStatus::Alive => "Alive",
            SiteStatus::Dead => "Dead",
            SiteStatus::Timeout => "Timeout",
            SiteStatus::Error => "Error",
            SiteStatus::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for SiteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Alive" => Ok(SiteStatus::Alive),
            "Dead" => Ok(SiteStatus::Dead),
            "Timeout" => Ok(SiteStatus::Timeout),
            "Error" => Ok(SiteStatus::Error),
            "Unknown" => Ok(SiteStatus::Unknown),
            other => Err(format!("unknown site status: {other}")),
        }
    }
}

/// A discovered onion site, identified by the digest of its site root URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub site_id: String,
    pub url: String,
    pub source: String,
    pub keyword: String,
    pub current_status: SiteStatus,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl SiteRecord {
    /// Builds a fresh record from any page or site-root URL; `site_id` is
    /// always derived from `site_root(url)`, never the raw input.
    pub fn new(url: &str, source: impl Into<String>, keyword: impl Into<String>) -> Self {
        let root = site_root(url);
        let now = Utc::now();
        Self {
            site_id: sha256_hex(&root),
            url: root,
            source: source.into(),
            keyword: keyword.into(),
            current_status: SiteStatus::Unknown,
            first_seen: now,
            last_seen: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_id_derives_from_site_root_not_raw_url() {
        let a = SiteRecord::new("http://example.onion/a/b", "Operator", "");
        let b = SiteRecord::new("http://example.onion/x", "Operator", "");
        assert_eq!(a.site_id, b.site_id);
        assert_eq!(a.url, "http://example.onion");
    }
}
