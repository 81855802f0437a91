use chrono::{DateTime, Local, Utc};
use serde_json::Value;

use crate::models::{Instance, InstanceState, OWNER_NOT_AVAILABLE, OWNER_TAG_KEY};
use super::client::api_get;
use super::error::ProviderError;

/// List every instance in one region.
/// The provider groups instances into reservations; these are flattened
/// into individual records in payload order. Network counters start at
/// zero and are filled in by the metric pass.
pub async fn list_instances(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    region: &str,
) -> Result<Vec<Instance>, ProviderError> {
    let params = vec![("region".to_string(), region.to_string())];
    let payload = api_get(client, api_base_url, api_token, "/v1/instances", &params).await?;
    parse_instances(&payload, region)
}

pub(crate) fn parse_instances(payload: &Value, region: &str) -> Result<Vec<Instance>, ProviderError> {
    let reservations = payload
        .get("data")
        .and_then(|d| d.get("reservations"))
        .and_then(|r| r.as_array())
        .ok_or_else(|| ProviderError::Malformed("instances payload has no reservations".into()))?;

    let mut instances = Vec::new();
    for reservation in reservations {
        let members = match reservation.get("instances").and_then(|i| i.as_array()) {
            Some(m) => m,
            None => continue,
        };
        for item in members {
            let obj = match item.as_object() {
                Some(o) => o,
                None => continue,
            };
            let id = obj
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let instance_type = obj
                .get("instanceType")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let state_raw = obj.get("state").and_then(|v| v.as_str()).unwrap_or("");
            let state = InstanceState::from_wire(state_raw).ok_or_else(|| {
                ProviderError::Malformed(format!("unknown instance state '{}'", state_raw))
            })?;
            let launch_raw = obj.get("launchTime").and_then(|v| v.as_str()).unwrap_or("");
            let launch_time = DateTime::parse_from_rfc3339(launch_raw)
                .map_err(|e| {
                    ProviderError::Malformed(format!("bad launchTime '{}': {}", launch_raw, e))
                })?
                .with_timezone(&Utc);
            // Localized once here; everything downstream shows this string.
            let launch_time_display = launch_time
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string();
            let owner = obj
                .get("tags")
                .and_then(|t| t.as_array())
                .and_then(|tags| {
                    tags.iter()
                        .find(|t| t.get("key").and_then(|k| k.as_str()) == Some(OWNER_TAG_KEY))
                })
                .and_then(|t| t.get("value"))
                .and_then(|v| v.as_str())
                .unwrap_or(OWNER_NOT_AVAILABLE)
                .to_string();

            instances.push(Instance {
                id,
                instance_type,
                launch_time,
                launch_time_display,
                owner,
                region: region.to_string(),
                state,
                network_in_bytes: 0.0,
                network_out_bytes: 0.0,
            });
        }
    }
    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn payload(reservations: Value) -> Value {
        json!({"code": "OKAY", "data": {"reservations": reservations}})
    }

    #[test]
    fn flattens_reservations_in_payload_order() {
        let p = payload(json!([
            {"instances": [
                {"id": "i-1", "instanceType": "m1.small", "state": "running",
                 "launchTime": "2026-03-01T08:30:00Z", "tags": []},
                {"id": "i-2", "instanceType": "m1.large", "state": "stopped",
                 "launchTime": "2026-03-02T08:30:00Z", "tags": []}
            ]},
            {"instances": [
                {"id": "i-3", "instanceType": "t2.micro", "state": "pending",
                 "launchTime": "2026-03-03T08:30:00Z", "tags": []}
            ]}
        ]));
        let instances = parse_instances(&p, "eu-west-2").unwrap();
        let ids: Vec<&str> = instances.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i-1", "i-2", "i-3"]);
        assert!(instances.iter().all(|i| i.region == "eu-west-2"));
        assert_eq!(
            instances[0].launch_time,
            Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap()
        );
        assert!(!instances[0].launch_time_display.is_empty());
    }

    #[test]
    fn owner_tag_lookup_and_sentinel() {
        let p = payload(json!([
            {"instances": [
                {"id": "i-1", "instanceType": "m1.small", "state": "running",
                 "launchTime": "2026-03-01T08:30:00Z",
                 "tags": [{"key": "team", "value": "infra"}, {"key": "user_id", "value": "abc"}]},
                {"id": "i-2", "instanceType": "m1.small", "state": "running",
                 "launchTime": "2026-03-01T08:30:00Z",
                 "tags": [{"key": "team", "value": "infra"}]},
                {"id": "i-3", "instanceType": "m1.small", "state": "running",
                 "launchTime": "2026-03-01T08:30:00Z"}
            ]}
        ]));
        let instances = parse_instances(&p, "us-east-1").unwrap();
        assert_eq!(instances[0].owner, "abc");
        assert_eq!(instances[1].owner, "N/A");
        assert_eq!(instances[2].owner, "N/A");
    }

    #[test]
    fn network_counters_start_at_zero() {
        let p = payload(json!([
            {"instances": [
                {"id": "i-1", "instanceType": "m1.small", "state": "running",
                 "launchTime": "2026-03-01T08:30:00Z", "tags": []}
            ]}
        ]));
        let instances = parse_instances(&p, "us-east-1").unwrap();
        assert_eq!(instances[0].network_in_bytes, 0.0);
        assert_eq!(instances[0].network_out_bytes, 0.0);
    }

    #[test]
    fn empty_reservations_yield_empty_list() {
        let p = payload(json!([]));
        assert!(parse_instances(&p, "us-east-1").unwrap().is_empty());
    }

    #[test]
    fn unknown_state_is_malformed() {
        let p = payload(json!([
            {"instances": [
                {"id": "i-1", "instanceType": "m1.small", "state": "hibernating",
                 "launchTime": "2026-03-01T08:30:00Z", "tags": []}
            ]}
        ]));
        assert!(matches!(
            parse_instances(&p, "us-east-1"),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn missing_reservations_is_malformed() {
        let p = json!({"code": "OKAY", "data": {}});
        assert!(matches!(
            parse_instances(&p, "us-east-1"),
            Err(ProviderError::Malformed(_))
        ));
    }
}
