//! Classification of API responses into retryable and fatal failures.

use anyhow::Result;
use reqwest::{Response, StatusCode};

/// Maximum number of attempts for idempotent requests.
pub const MAX_ATTEMPTS: usize = 3;

/// Delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Failures that will not go away by asking again.
#[derive(Debug, PartialEq, Eq)]
pub enum NonRetryableError {
    /// HTTP 429, or 403 with an exhausted rate limit
    RateLimitExceeded,
    /// HTTP 401
    AuthenticationFailed,
    /// HTTP 403 for any other reason
    Forbidden(String),
    /// HTTP 404
    NotFound(String),
    /// Any other 4xx
    ClientError(u16, String),
}

impl std::fmt::Display for NonRetryableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonRetryableError::RateLimitExceeded => {
                write!(f, "GitHub API rate limit exceeded. Try again later.")
            }
            NonRetryableError::AuthenticationFailed => {
                write!(f, "Authentication failed. Check your GITHUB_TOKEN.")
            }
            NonRetryableError::Forbidden(url) => write!(
                f,
                "Access forbidden: {}. The token needs the read:packages and delete:packages scopes.",
                url
            ),
            NonRetryableError::NotFound(url) => write!(f, "Not found: {}", url),
            NonRetryableError::ClientError(status, url) => {
                write!(f, "Request rejected with HTTP {}: {}", status, url)
            }
        }
    }
}

impl std::error::Error for NonRetryableError {}

/// Returns the fatal failure a response represents, if any.
/// Successful, 5xx and other non-client-error responses yield `None`.
pub fn classify_response(response: &Response) -> Option<NonRetryableError> {
    let url = response.url().to_string();

    match response.status() {
        StatusCode::UNAUTHORIZED => Some(NonRetryableError::AuthenticationFailed),
        StatusCode::TOO_MANY_REQUESTS => Some(NonRetryableError::RateLimitExceeded),
        StatusCode::FORBIDDEN => {
            let exhausted = response
                .headers()
                .get(RATE_LIMIT_REMAINING)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.trim() == "0");
            if exhausted {
                Some(NonRetryableError::RateLimitExceeded)
            } else {
                Some(NonRetryableError::Forbidden(url))
            }
        }
        StatusCode::NOT_FOUND => Some(NonRetryableError::NotFound(url)),
        s if s.is_client_error() => Some(NonRetryableError::ClientError(s.as_u16(), url)),
        _ => None,
    }
}

/// Passes successful responses through. Fatal statuses become a
/// [`NonRetryableError`]; anything else stays a plain `reqwest::Error`.
pub fn check_response(response: Response) -> Result<Response> {
    if let Some(non_retryable) = classify_response(&response) {
        return Err(non_retryable.into());
    }
    Ok(response.error_for_status()?)
}
