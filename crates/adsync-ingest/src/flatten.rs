//! Flattening of grouped campaign listings into records
//!
//! The API groups campaigns by type and status:
//!
//! ```json
//! { "adverts": [
//!     { "type": 8, "status": 9, "count": 2,
//!       "advert_list": [ { "advertId": 42, "changeTime": "..." }, ... ] }
//! ], "all": 2 }
//! ```
//!
//! Each leaf becomes one [`CampaignRecord`] carrying its group's `type` and
//! `status`. A missing or null `adverts` / `advert_list` contributes nothing;
//! a missing or mistyped field on a group or leaf fails the whole response.

use crate::error::{IngestError, Result};
use adsync_common::CampaignRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PromotionCount {
    // Accounts with no campaigns get `"adverts": null`; read as an empty list
    #[serde(default)]
    adverts: Option<Vec<CampaignGroup>>,
}

#[derive(Debug, Deserialize)]
struct CampaignGroup {
    #[serde(rename = "type")]
    kind: i64,
    status: i64,
    #[serde(default)]
    advert_list: Option<Vec<CampaignEntry>>,
}

#[derive(Debug, Deserialize)]
struct CampaignEntry {
    #[serde(rename = "advertId")]
    advert_id: i64,
    #[serde(rename = "changeTime")]
    change_time: String,
}

/// Flatten a raw API response into one record per campaign
///
/// Output order follows the input: groups in order, and within each group its
/// campaigns in order.
pub fn flatten(raw: serde_json::Value) -> Result<Vec<CampaignRecord>> {
    let response: PromotionCount = serde_json::from_value(raw)
        .map_err(|e| IngestError::malformed(format!("unexpected campaign listing: {}", e)))?;

    let records = response
        .adverts
        .unwrap_or_default()
        .into_iter()
        .flat_map(|group| {
            let (kind, status) = (group.kind, group.status);
            group
                .advert_list
                .unwrap_or_default()
                .into_iter()
                .map(move |entry| CampaignRecord {
                    advert_id: entry.advert_id,
                    kind,
                    status,
                    change_time: entry.change_time,
                })
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_group_two_campaigns() {
        let raw = json!({
            "adverts": [{
                "type": 8,
                "status": 9,
                "advert_list": [
                    { "advertId": 42, "changeTime": "t1" },
                    { "advertId": 43, "changeTime": "t2" }
                ]
            }]
        });

        let records = flatten(raw).unwrap();

        assert_eq!(
            records,
            vec![
                CampaignRecord::new(42, 8, 9, "t1"),
                CampaignRecord::new(43, 8, 9, "t2"),
            ]
        );
    }

    #[test]
    fn test_group_fields_broadcast_and_order_kept() {
        let raw = json!({
            "adverts": [
                {
                    "type": 9,
                    "status": 11,
                    "count": 2,
                    "advert_list": [
                        { "advertId": 3, "changeTime": "2024-03-01T10:00:00.1+03:00" },
                        { "advertId": 1, "changeTime": "2024-03-02T10:00:00.1+03:00" }
                    ]
                },
                {
                    "type": 8,
                    "status": 7,
                    "count": 1,
                    "advert_list": [
                        { "advertId": 2, "changeTime": "2024-01-15T08:30:00+03:00" }
                    ]
                }
            ],
            "all": 3
        });

        let records = flatten(raw).unwrap();

        let ids: Vec<i64> = records.iter().map(|r| r.advert_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(records[..2].iter().all(|r| r.kind == 9 && r.status == 11));
        assert_eq!((records[2].kind, records[2].status), (8, 7));
        assert_eq!(records[0].change_time, "2024-03-01T10:00:00.1+03:00");
    }

    #[test]
    fn test_empty_inputs_yield_no_records() {
        assert!(flatten(json!({ "adverts": [] })).unwrap().is_empty());
        assert!(flatten(json!({ "adverts": null, "all": 0 })).unwrap().is_empty());
        assert!(flatten(json!({})).unwrap().is_empty());

        let empty_group = json!({
            "adverts": [{ "type": 8, "status": 9, "advert_list": [] }]
        });
        assert!(flatten(empty_group).unwrap().is_empty());

        let group_without_list = json!({ "adverts": [{ "type": 8, "status": 9 }] });
        assert!(flatten(group_without_list).unwrap().is_empty());
    }

    #[test]
    fn test_missing_advert_id_is_malformed() {
        let raw = json!({
            "adverts": [{
                "type": 8,
                "status": 9,
                "advert_list": [
                    { "advertId": 42, "changeTime": "t1" },
                    { "changeTime": "t2" }
                ]
            }]
        });

        let err = flatten(raw).unwrap_err();

        assert!(matches!(err, IngestError::MalformedResponse(_)));
        assert!(err.to_string().contains("advertId"));
    }

    #[test]
    fn test_missing_group_status_is_malformed() {
        let raw = json!({
            "adverts": [{ "type": 8, "advert_list": [] }]
        });

        assert!(matches!(flatten(raw), Err(IngestError::MalformedResponse(_))));
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        assert!(matches!(
            flatten(json!([1, 2, 3])),
            Err(IngestError::MalformedResponse(_))
        ));
    }
}
