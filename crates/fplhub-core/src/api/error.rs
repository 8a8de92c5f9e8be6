use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the FPL API. Every variant is retried by
/// [`RetryPolicy`](super::RetryPolicy) before it reaches the caller.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401/403. The public endpoints only return these when blocked.
    #[error("FPL API refused the request: {0}")]
    AccessDenied(String),

    /// Unknown player or team id, or a mistyped endpoint.
    #[error("Not found on the FPL API: {0}")]
    NotFound(String),

    #[error("FPL API rate limit hit")]
    RateLimited,

    /// 5xx. Upstream returns 503 while a gameweek is being processed.
    #[error("FPL API unavailable: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Body was not the JSON shape expected for the endpoint.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Error bodies longer than this are cut before they land in messages.
const MAX_BODY_CHARS: usize = 500;

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = format!("{} {}", status.as_u16(), excerpt(body));
        match status.as_u16() {
            401 | 403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(detail),
        }
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    let total = body.chars().count();
    if total <= MAX_BODY_CHARS {
        return body.to_string();
    }
    let cut: String = body.chars().take(MAX_BODY_CHARS).collect();
    format!("{}... ({} of {} chars)", cut, MAX_BODY_CHARS, total)
}
