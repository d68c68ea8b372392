//! HTTP retry helper for transient upstream errors.
//!
//! Every client call goes through [`send_json`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so each request gets
//! automatic retry with exponential backoff for transient failures
//! (timeouts, connection resets, server errors, rate limiting).

use std::time::Duration;

use crate::ApiError;

/// Maximum number of retry attempts for transient HTTP errors.
///
/// With exponential backoff (2s, 4s, 8s) the total wait before giving up
/// is 14 seconds. These requests back interactive dashboard panels, so
/// the cap stays low: a panel is better served by a prompt error state
/// than by a minute of silent retrying.
const MAX_RETRIES: u32 = 3;

/// Sends an HTTP request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`] (builders are consumed by
/// `.send()`), which lets any request shape retry: GET, POST with a
/// JSON body, multipart uploads.
///
/// Retries connection errors, timeouts, HTTP 429, and HTTP 5xx with
/// exponential backoff. Other 4xx statuses are permanent and fail
/// immediately.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails after all retries, the
/// upstream answers with a non-retryable status, or the body is not
/// valid JSON.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, ApiError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(&build_request).await?;
    let url = response.url().to_string();
    let status = response.status();

    // Read the raw body as text first, then parse, so a decode failure
    // can log what actually came back.
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|json_err| {
        let preview: String = text.chars().take(200).collect();
        log::error!(
            "JSON decode failed for {url} (status {status}): {json_err}; body preview: {preview}"
        );
        ApiError::Upstream {
            message: format!("undecodable response from {url} (status {status}): {json_err}"),
        }
    })
}

/// Core retry loop: sends the request built by `build_request`, retrying
/// transient errors with exponential backoff, and returns the successful
/// response.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(build_request: &F) -> Result<reqwest::Response, ApiError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_error: Option<ApiError> = None;

    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_secs(1_u64 << attempt); // 2s, 4s, 8s
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < MAX_RETRIES {
                    log::warn!("  transient error: {e}");
                    last_error = Some(ApiError::Http(e));
                    continue;
                }
                return Err(ApiError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                // 429 and 5xx are worth retrying; other 4xx is permanent.
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    if attempt < MAX_RETRIES {
                        log::warn!("  HTTP {status}, retrying");
                        last_error = Some(ApiError::Upstream {
                            message: format!("HTTP {status}"),
                        });
                        continue;
                    }
                    return Err(ApiError::Upstream {
                        message: format!("HTTP {status} after {MAX_RETRIES} retries"),
                    });
                }

                if status.is_client_error() {
                    return Err(ApiError::Upstream {
                        message: format!("HTTP {status}"),
                    });
                }

                return Ok(response);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ApiError::Upstream {
        message: "request failed after all retries".to_string(),
    }))
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}
