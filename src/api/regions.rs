use super::client::api_get;
use super::error::ProviderError;

/// Enumerate all regions visible to the account, in provider order.
/// The configured default region scopes the call and has no other role.
/// No retries, no caching: every scan asks again.
pub async fn list_regions(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    default_region: &str,
) -> Result<Vec<String>, ProviderError> {
    let params = vec![("region".to_string(), default_region.to_string())];
    let payload = api_get(client, api_base_url, api_token, "/v1/regions", &params).await?;

    let arr = payload
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| ProviderError::Malformed("regions payload has no data array".into()))?;

    let mut regions = Vec::new();
    for r in arr {
        if let Some(obj) = r.as_object() {
            let id = obj
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            if !id.is_empty() {
                regions.push(id);
            }
        }
    }
    Ok(regions)
}
