//! # Swap Quote Client
//!
//! Integration with a 0x-style swap API for indicative prices and firm quotes.

// region: --- Modules
pub mod client;
pub mod price;
pub mod quote;
pub mod tokens;
pub mod types;
// endregion: --- Modules

// region: --- Main Client
use client::SwapHttpClient;
use lib_core::{AppError, Result};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://base.api.0x.org/swap/v1";

/// Builder for configuring SwapClient.
///
/// Allows fluent configuration of client settings before building.
#[derive(Debug, Clone)]
pub struct SwapClientBuilder {
    timeout: Option<Duration>,
    api_base: Option<String>,
    api_key: Option<String>,
}

impl Default for SwapClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(10)),
            api_base: Some(DEFAULT_API_BASE.to_string()),
            api_key: None,
        }
    }
}

impl SwapClientBuilder {
    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the swap API base URL.
    pub fn api_base(mut self, url: String) -> Self {
        self.api_base = Some(url);
        self
    }

    /// Set the API key sent as `0x-api-key`.
    pub fn api_key(mut self, key: String) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Build the SwapClient with configured settings.
    pub fn build(self) -> Result<SwapClient> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or_else(|| Duration::from_secs(10)))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let api_base = self.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let inner = SwapHttpClient {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: self.api_key,
        };

        Ok(SwapClient { inner })
    }
}

/// Client for the swap quote API
pub struct SwapClient {
    inner: SwapHttpClient,
}

impl SwapClient {
    /// Create a new swap client using a builder for configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use lib_solana::swap::SwapClient;
    ///
    /// let client = SwapClient::builder()
    ///     .timeout(std::time::Duration::from_secs(30))
    ///     .api_key("your-api-key".to_string())
    ///     .build()?;
    /// # Ok::<(), lib_core::AppError>(())
    /// ```
    pub fn builder() -> SwapClientBuilder {
        SwapClientBuilder::default()
    }

    /// Create a client from the loaded application configuration.
    pub fn from_config(config: &lib_core::Config) -> Result<Self> {
        let mut builder = Self::builder().api_base(config.swap_api_base.clone());
        if let Some(key) = &config.swap_api_key {
            builder = builder.api_key(key.clone());
        }
        builder.build()
    }

    pub async fn get_price(&self, params: &types::SwapParams) -> Result<types::PriceResponse> {
        self.inner.get_price(params).await
    }

    pub async fn get_quote(&self, params: &types::SwapParams) -> Result<types::QuoteResponse> {
        self.inner.get_quote(params).await
    }
}
// endregion: --- Main Client

// Re-export commonly used types
pub use tokens::{find_token_by_address, find_token_by_symbol, tokens_for_chain, Token, BASE_CHAIN_ID};
pub use types::*;
