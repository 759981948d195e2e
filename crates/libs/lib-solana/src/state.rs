//! # Service Container
//!
//! Aggregates the network-facing services the widgets need into one cheaply
//! cloneable value:
//!
//! ```text
//! ┌─────────────────┐
//! │  SolanaState    │
//! └────────┬────────┘
//!          ├─► SolanaClient    (RPC: balances, fees, send/confirm, history, stats)
//!          ├─► SwapClient      (swap API: indicative prices and firm quotes)
//!          ├─► PriceFeedClient (spot USD prices)
//!          └─► PriceCache      (10 s cache in front of the price feed)
//! ```

use crate::cache::PriceCache;
use crate::client::SolanaClient;
use crate::price_feed::PriceFeedClient;
use crate::swap::SwapClient;
use lib_core::{AppError, Config, Result};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct SolanaState {
    pub rpc: Arc<SolanaClient>,
    pub swap: Arc<SwapClient>,
    pub price_feed: Arc<PriceFeedClient>,
    pub price_cache: Arc<PriceCache>,
    /// Address that receives donations
    pub recipient: Pubkey,
}

impl SolanaState {
    /// Build every service from the loaded configuration.
    ///
    /// No network request is made here; clients connect lazily.
    pub fn from_config(config: &Config) -> Result<Self> {
        let recipient = Pubkey::from_str(&config.recipient_address)
            .map_err(|e| AppError::Config(format!("DONATION_RECIPIENT is not a valid address: {}", e)))?;

        let rpc = Arc::new(SolanaClient::from_config(config)?);
        info!(network = %rpc.network(), "Solana RPC client created");

        let swap = Arc::new(SwapClient::from_config(config)?);
        info!("Swap API client ready");

        let price_feed = Arc::new(PriceFeedClient::new(config.price_api_base.clone())?);
        let price_cache = Arc::new(PriceCache::new(price_feed.clone()));
        info!("Price cache initialized");

        Ok(Self {
            rpc,
            swap,
            price_feed,
            price_cache,
            recipient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(recipient: &str) -> Config {
        Config {
            recipient_address: recipient.to_string(),
            network: "devnet".to_string(),
            helius_api_key: None,
            rpc_url: None,
            keypair_path: None,
            swap_api_base: "https://base.api.0x.org/swap/v1".to_string(),
            swap_api_key: None,
            price_api_base: "https://api.coingecko.com/api/v3".to_string(),
            confirmation_timeout_secs: 30,
            send_max_retries: 5,
            quote_debounce_ms: 500,
            stats_interval_secs: 60,
            history_interval_secs: 30,
            history_limit: 10,
        }
    }

    #[test]
    fn test_from_config() {
        let state = SolanaState::from_config(&config("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin")).unwrap();
        assert_eq!(state.recipient.to_string(), "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin");
        assert_eq!(state.rpc.url(), "https://api.devnet.solana.com");
    }

    #[test]
    fn test_invalid_recipient() {
        let err = SolanaState::from_config(&config("not a pubkey")).err().unwrap();
        assert_eq!(err.code(), "Config");
    }
}
