// [libs/domain/models/src/classification.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A classifier run's verdict for one site, restoring the `SiteClassification`
/// table named in `spec.md` §6 (persisted schema) but not elaborated in §4.11.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub site_id: String,
    pub model_name: String,
    pub model_version: String,
    pub predicted_keyword: String,
    pub confidence: f64,
    pub analysed_at: DateTime<Utc>,
    pub status: String,
}

impl Classification {
    pub fn new(site_id: impl Into<String>, predicted_keyword: impl Into<String>, confidence: f64) -> Self {
        Self {
            site_id: site_id.into(),
            model_name: "keyword-dictionary".to_string(),
            model_version: "1".to_string(),
            predicted_keyword: predicted_keyword.into(),
            confidence,
            analysed_at: Utc::now(),
            status: "completed".to_string(),
        }
    }
}
