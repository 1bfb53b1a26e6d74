//! Configuration module
//!
//! Connection settings for the universal API.

use anyhow::{Context, Result};
use factory_client::UniversalClient;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the universal API
    pub api_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds an API client honouring the configured timeout
    pub fn client(&self) -> Result<UniversalClient> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(UniversalClient::with_client(&self.api_url, http))
    }
}
