// [libs/domain/models/src/liveness.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::sha256_hex;
use crate::site::SiteStatus;

/// A timestamped liveness observation about a site root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liveness {
    pub liveness_id: String,
    pub site_id: String,
    pub status: SiteStatus,
    pub response_time: Option<f64>,
    pub check_time: DateTime<Utc>,
}

impl Liveness {
    pub fn new(site_id: impl Into<String>, status: SiteStatus, response_time: Option<f64>) -> Self {
        let site_id = site_id.into();
        let check_time = Utc::now();
        Self {
            liveness_id: sha256_hex(&format!("{site_id}:{}", check_time.to_rfc3339())),
            site_id,
            status,
            response_time,
            check_time,
        }
    }
}
