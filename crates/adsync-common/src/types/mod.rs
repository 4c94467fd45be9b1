//! Common types used across adsync

use serde::{Deserialize, Serialize};

/// One advertising campaign, flattened out of its campaign group.
///
/// `kind` and `status` belong to the group the campaign was listed under;
/// `advert_id` and `change_time` come from the campaign entry itself.
/// `change_time` is kept exactly as the API sent it.
///
/// Serializes with the API's field names (`advertId`, `type`, `status`,
/// `changeTime`).
///
/// # Examples
///
/// ```
/// use adsync_common::types::CampaignRecord;
///
/// let record = CampaignRecord::new(42, 8, 9, "t1");
/// assert_eq!(record.advert_id, 42);
/// assert_eq!(record.kind, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    #[serde(rename = "advertId")]
    pub advert_id: i64,

    #[serde(rename = "type")]
    pub kind: i64,

    pub status: i64,

    #[serde(rename = "changeTime")]
    pub change_time: String,
}

impl CampaignRecord {
    pub fn new(advert_id: i64, kind: i64, status: i64, change_time: impl Into<String>) -> Self {
        Self {
            advert_id,
            kind,
            status,
            change_time: change_time.into(),
        }
    }
}

impl std::fmt::Display for CampaignRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "advert {} (type {}, status {}, changed {})",
            self.advert_id, self.kind, self.status, self.change_time
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_with_api_field_names() {
        let record = CampaignRecord::new(42, 8, 9, "2024-01-01T00:00:00Z");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({
                "advertId": 42,
                "type": 8,
                "status": 9,
                "changeTime": "2024-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_display() {
        let record = CampaignRecord::new(7, 4, 11, "t1");
        assert_eq!(record.to_string(), "advert 7 (type 4, status 11, changed t1)");
    }
}
