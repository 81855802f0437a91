use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::client::api_get;
use super::error::{MetricError, ProviderError};

pub const METRIC_NETWORK_IN: &str = "NetworkIn";
pub const METRIC_NETWORK_OUT: &str = "NetworkOut";
/// Hourly datapoints.
pub const METRIC_PERIOD_SECONDS: u32 = 3600;

/// Sum one named metric for one instance over [start, now].
/// The provider returns a datapoint per period; the Sum statistic of
/// every datapoint is added into a single scalar.
pub async fn metric_sum(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    region: &str,
    instance_id: &str,
    metric: &str,
    start: DateTime<Utc>,
) -> Result<f64, MetricError> {
    let end = Utc::now();
    let params = vec![
        ("region".to_string(), region.to_string()),
        ("metric".to_string(), metric.to_string()),
        ("instanceId".to_string(), instance_id.to_string()),
        (
            "start".to_string(),
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            "end".to_string(),
            end.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        ("period".to_string(), METRIC_PERIOD_SECONDS.to_string()),
        ("statistic".to_string(), "Sum".to_string()),
    ];
    let payload = api_get(
        client,
        api_base_url,
        api_token,
        "/v1/metrics/statistics",
        &params,
    )
    .await
    .map_err(|source| MetricError {
        metric: metric.to_string(),
        instance_id: instance_id.to_string(),
        source,
    })?;
    Ok(sum_datapoints(&payload))
}

/// A payload without datapoints sums to zero.
pub(crate) fn sum_datapoints(payload: &Value) -> f64 {
    payload
        .get("data")
        .and_then(|d| d.get("datapoints"))
        .and_then(|d| d.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|dp| dp.get("sum").and_then(|v| v.as_f64()))
                .sum()
        })
        .unwrap_or(0.0)
}
