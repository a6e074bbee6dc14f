//! Response status handling for the completion endpoint.

use crate::error::UpstreamError;

const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Map error statuses to [`UpstreamError`], passing successful responses through.
///
/// - **401** → [`UpstreamError::AuthFailed`]
/// - **429** → [`UpstreamError::RateLimited`], reading `Retry-After` in
///   seconds (5 s when absent or unparseable)
/// - any other non-success → [`UpstreamError::Api`] with the response body
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    let status = resp.status();
    if status == 401 {
        return Err(UpstreamError::AuthFailed);
    }
    if status == 429 {
        return Err(UpstreamError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !status.is_success() {
        return Err(UpstreamError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
