//! # Spot Price Feed Client
//!
//! USD spot prices from a CoinGecko-compatible `simple/price` endpoint:
//!
//! ```text
//! GET {base}/simple/price?ids=solana&vs_currencies=usd
//! { "solana": { "usd": 145.5 } }
//! ```
//!
//! ## Example
//! ```no_run
//! # async fn example() -> lib_core::Result<()> {
//! use lib_solana::price_feed::PriceFeedClient;
//!
//! let client = PriceFeedClient::new("https://api.coingecko.com/api/v3")?;
//! let sol_price = client.get_price("SOL").await?;
//! println!("SOL: ${:.2}", sol_price);
//! # Ok(())
//! # }
//! ```

use lib_core::{AppError, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// `{ "<coin id>": { "<currency>": price } }`
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Client for the spot price API.
pub struct PriceFeedClient {
    http: Client,
    base_url: String,
}

impl PriceFeedClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Map a token symbol to the price API's coin id.
    ///
    /// Wrapped tokens share the id of the underlying asset.
    pub fn symbol_to_coin_id(symbol: &str) -> Option<&'static str> {
        match symbol.to_uppercase().as_str() {
            "SOL" => Some("solana"),
            "ETH" | "WETH" => Some("ethereum"),
            "BTC" | "WBTC" => Some("bitcoin"),
            "USDC" => Some("usd-coin"),
            "USDT" => Some("tether"),
            "DAI" => Some("dai"),
            "LINK" => Some("chainlink"),
            _ => None,
        }
    }

    /// USD price of a token by symbol.
    pub async fn get_price(&self, symbol: &str) -> Result<f64> {
        let coin_id = Self::symbol_to_coin_id(symbol)
            .ok_or_else(|| AppError::Validation(format!("No price feed for symbol: {}", symbol)))?;
        self.get_usd_price(coin_id).await
    }

    /// USD price of a coin by its price-API id.
    pub async fn get_usd_price(&self, coin_id: &str) -> Result<f64> {
        let url = format!("{}/simple/price", self.base_url);
        debug!(coin_id, "Fetching spot price");

        let response = self
            .http
            .get(&url)
            .query(&[("ids", coin_id), ("vs_currencies", "usd")])
            .send()
            .await
            .map_err(|e| {
                warn!(coin_id, error = %e, "Price request failed");
                AppError::Network(format!("Price request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Network(format!("Failed to fetch price: {} {}", status, body)));
        }

        let prices: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| AppError::Decoding(format!("Price response parse failed: {}", e)))?;

        prices
            .get(coin_id)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| AppError::Decoding(format!("No USD price in response for {}", coin_id)))
    }
}
