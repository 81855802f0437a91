use serde_json::Value;
use yansi::Paint;
use std::sync::atomic::{AtomicBool, Ordering};

use super::error::ProviderError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

/// Core HTTP client function for provider API calls.
/// Handles authentication, request building and envelope validation.
/// Every call the dashboard makes is a read, so only GET is supported.
pub async fn api_get(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    endpoint: &str,
    params: &[(String, String)],
) -> Result<Value, ProviderError> {
    // --- Curl Logging ---
    let mut url_for_log = format!("{}{}", api_base_url, endpoint);
    if !params.is_empty() {
        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<String>>()
            .join("&");
        url_for_log = format!("{}?{}", url_for_log, query_string);
    }

    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("'{}'", Paint::new(&url_for_log).fg(yansi::Color::Cyan)));
    if !api_token.is_empty() {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new(format!("'API-Token: {}'", api_token)).fg(yansi::Color::Magenta)
        ));
    }
    log_output(format!("Request:\n{}", parts.join(" ")));
    // --------------------

    let url = format!("{}{}", api_base_url, endpoint);
    let mut req = client.get(&url);

    if !api_token.is_empty() {
        req = req.header("API-Token", api_token);
    }

    if !params.is_empty() {
        req = req.query(params);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;
    let payload: Value = resp
        .json()
        .await
        .map_err(|e| ProviderError::Malformed(format!("not JSON: {}", e)))?;

    // Colorize the response JSON for better readability in the terminal
    let json_str = serde_json::to_string(&payload).unwrap_or_else(|_| format!("{:?}", payload));
    let response_str = Paint::new(json_str).rgb(100, 100, 100).to_string();
    log_output(format!("Response:\n{}", response_str));

    match payload.get("code").and_then(|c| c.as_str()) {
        Some("OKAY") => Ok(payload),
        Some(code) => Err(ProviderError::Api {
            code: code.to_string(),
            detail: payload
                .get("detail")
                .and_then(|d| d.as_str())
                .unwrap_or("")
                .to_string(),
        }),
        None => Err(ProviderError::Malformed("missing envelope code".into())),
    }
}
