//! HTTP transport for the FPL API.
//!
//! `ApiClient` talks to the network only through the [`Transport`] trait, so
//! tests can hand it a scripted fake instead of a live connection.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header;
use serde_json::Value;
use tracing::debug;

use super::ApiError;

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The public API rejects requests without a browser-like agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Issues a single GET and decodes the JSON body. No retries at this level.
pub trait Transport {
    fn get_json(&self, url: &str) -> Result<Value, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        (**self).get_json(url)
    }
}

/// Blocking reqwest transport.
/// Clone is cheap - reqwest::blocking::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Check if response is successful, returning an error with body if not.
    fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()?;

        let response = Self::check_response(response)?;
        debug!(url, status = %response.status(), "GET succeeded");

        Ok(response.json()?)
    }
}
