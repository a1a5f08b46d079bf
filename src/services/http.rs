use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::{AppError, Result};

/// Per-request timeout; the original job had none and could hang forever.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_RETRIES: u32 = 3;

/// Shared client construction: timeout, crate user agent, optional HTTPS
/// proxy (used for the messaging provider only).
pub fn build_client(https_proxy: Option<&str>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("stockpulse/", env!("CARGO_PKG_VERSION")));

    if let Some(proxy) = https_proxy {
        let proxy = reqwest::Proxy::https(proxy)
            .map_err(|e| AppError::Config(format!("invalid HTTPS proxy '{}': {}", proxy, e)))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| AppError::Network(format!("failed to create HTTP client: {}", e)))
}

/// GET a JSON document. Non-2xx fails the run; transient failures (network
/// error, 5xx, 429) are retried with exponential backoff plus jitter, 4xx
/// is not. Query parameters are passed separately so log lines never carry
/// API keys.
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Value> {
    let mut last_error: Option<String> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay =
                Duration::from_secs_f64(2.0_f64.powi(attempt as i32 - 1) + rand::random::<f64>());
            info!(
                "retrying GET {} (attempt {}/{}) after {:.1}s - reason: {}",
                url,
                attempt + 1,
                MAX_RETRIES,
                delay.as_secs_f64(),
                last_error.as_deref().unwrap_or("unknown error")
            );
            sleep(delay).await;
        }

        debug!("GET {} (attempt {})", url, attempt + 1);
        let response = match client.get(url).query(query).send().await {
            Ok(response) => response,
            Err(e) => {
                last_error = Some(format!("network error: {}", e));
                continue;
            }
        };

        let status = response.status();
        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| AppError::Network(format!("failed to read response body: {}", e)))?;
            return serde_json::from_str(&body)
                .map_err(|e| AppError::Parse(format!("invalid JSON from {}: {}", url, e)));
        }

        if is_retryable(status) {
            last_error = Some(format!("HTTP {} from {}", status, url));
            continue;
        }

        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Network(format!(
            "HTTP {} from {}: {}",
            status, url, body
        )));
    }

    Err(AppError::Network(format!(
        "GET {} failed after {} attempts: {}",
        url,
        MAX_RETRIES,
        last_error.unwrap_or_default()
    )))
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
