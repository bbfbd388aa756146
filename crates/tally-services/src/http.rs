//! Shared HTTP helpers for the service clients.
//!
//! Status checks live here (429 with `Retry-After`, other non-success codes
//! as [`ServiceError::Api`]) so each client only builds requests and maps
//! responses.

use std::time::Duration;

use crate::error::ServiceError;

const USER_AGENT: &str = concat!("tally/", env!("CARGO_PKG_VERSION"));

/// Build the shared `reqwest` client.
///
/// # Errors
///
/// Returns [`ServiceError::Http`] if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Join a service endpoint and a path without doubling the slash.
pub fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on any 2xx status (including 207 from
/// partial uploads).
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    if resp.status() == 429 {
        return Err(ServiceError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(ServiceError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
