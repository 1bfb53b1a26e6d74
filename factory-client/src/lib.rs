//! Factory Universal API Client
//!
//! A small, type-safe HTTP client for the "universal tables" API that stores
//! Factory pipeline runs as generic entities, transactions, transaction
//! lines and relationships.
//!
//! # Example
//!
//! ```no_run
//! use factory_client::UniversalClient;
//!
//! # async fn example() -> factory_client::Result<()> {
//! let client = UniversalClient::new("http://localhost:3000");
//! let modules = client.list_modules().await?;
//! println!("{} module(s)", modules.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
mod entities;
mod relationships;
mod transactions;

pub use error::{ClientError, Result};
pub use transactions::TransactionQuery;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// HTTP client for the universal tables API
///
/// Endpoints are grouped by table:
/// - Entities (modules, fiscal periods)
/// - Transactions and their lines
/// - Relationships
#[derive(Debug, Clone)]
pub struct UniversalClient {
    /// Base URL of the API (e.g., "http://localhost:3000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

/// Response envelope used by every universal endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl UniversalClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "http://localhost:3000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, table: &str) -> String {
        format!("{}/api/v1/universal/{}", self.base_url, table)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code, then unwrap the JSON envelope
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        open_envelope(envelope)
    }
}

fn open_envelope<T>(envelope: Envelope<T>) -> Result<T> {
    if !envelope.success {
        return Err(ClientError::Rejected(
            envelope
                .error
                .unwrap_or_else(|| "request was not successful".to_string()),
        ));
    }

    envelope
        .data
        .ok_or_else(|| ClientError::ParseError("Response has no `data` field".to_string()))
}
