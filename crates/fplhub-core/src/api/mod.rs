//! REST API client module for the Fantasy Premier League services.
//!
//! `ApiClient` wraps a [`Transport`] with retries and routes the bootstrap
//! snapshot and its derived tables through the local store. The API is
//! public and unauthenticated.

pub mod client;
pub mod error;
pub mod retry;
pub mod transport;

pub use client::{bootstrap_timestamp, ApiClient};
pub use error::ApiError;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, Transport};
