//! Jobreq HTTP Client
//!
//! A small, type-safe client for the parts of the Bamboo REST API a
//! requirement sweep needs: the plan listing, the per-plan job search and
//! the job requirement endpoint.
//!
//! Every request carries HTTP Basic credentials and is bounded by the
//! timeout the client was built with.
//!
//! # Example
//!
//! ```no_run
//! use jobreq_client::BambooClient;
//! use jobreq_core::domain::Credentials;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BambooClient::new(
//!         "https://bamboo.example.com/bamboo",
//!         Credentials::new("user", "secret"),
//!         Duration::from_secs(30),
//!     )?;
//!
//!     let page = client.list_plans(999, 0).await?;
//!     println!("{} plan(s) on the first page", page.plan.len());
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
mod jobs;
mod plans;
mod requirements;

pub use api::BambooApi;
pub use error::{ClientError, Result};

use jobreq_core::domain::Credentials;
use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Prefix every endpoint lives under
const API_PREFIX: &str = "/rest/api/latest";

/// HTTP client for the Bamboo REST API
#[derive(Debug, Clone)]
pub struct BambooClient {
    /// Base URL of the server (e.g., "https://bamboo.example.com/bamboo")
    base_url: String,
    /// Credentials sent with every request
    credentials: Credentials,
    /// HTTP client instance
    client: Client,
}

impl BambooClient {
    /// Create a new client whose requests time out after `timeout`
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the server, without the `/rest/api` suffix
    /// * `credentials` - Username and password for HTTP Basic authentication
    /// * `timeout` - Upper bound for each request, connect to last byte
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::ConnectionFailed(e.to_string()))?;

        Ok(Self::with_client(base_url, credentials, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc. The caller is
    /// responsible for setting a timeout on `client`.
    ///
    /// # Example
    /// ```
    /// use jobreq_client::BambooClient;
    /// use jobreq_core::domain::Credentials;
    /// use reqwest::Client;
    ///
    /// let client = BambooClient::with_client(
    ///     "http://localhost:8085/bamboo",
    ///     Credentials::new("user", "secret"),
    ///     Client::new(),
    /// );
    /// ```
    pub fn with_client(base_url: impl Into<String>, credentials: Credentials, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path such as `/plan`
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Attach the headers every request carries
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(header::ACCEPT, "application/json")
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is not needed
    ///
    /// This method checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("admin", "secret")
    }

    #[test]
    fn test_client_creation() {
        let client =
            BambooClient::new("http://localhost:8085/bamboo", creds(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8085/bamboo");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client =
            BambooClient::new("http://localhost:8085/bamboo/", creds(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8085/bamboo");
    }

    #[test]
    fn test_endpoint_building() {
        let client = BambooClient::with_client("http://localhost:8085", creds(), Client::new());
        assert_eq!(
            client.endpoint("/search/jobs/DVOPS-MAIN"),
            "http://localhost:8085/rest/api/latest/search/jobs/DVOPS-MAIN"
        );
    }
}
