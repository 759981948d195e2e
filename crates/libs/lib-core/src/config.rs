//! # Application Configuration
//!
//! This module manages configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let recipient = &config.recipient_address;
//! ```
//!
//! The config must be initialized once at application startup using [`init_config()`].

use lib_utils::envs::{get_env, get_env_or, get_env_parse_or};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

/// Configuration for the donation and swap widgets.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base58 address that receives donations (`DONATION_RECIPIENT`)
    pub recipient_address: String,

    /// Solana cluster name, `mainnet` or `devnet` (`SOLANA_NETWORK`)
    pub network: String,

    /// Optional Helius API key for premium mainnet RPC (`HELIUS_API_KEY`)
    pub helius_api_key: Option<String>,

    /// Explicit RPC URL, overrides `network` (`SOLANA_RPC_URL`)
    pub rpc_url: Option<String>,

    /// Keypair file used by the local signing wallet (`WALLET_KEYPAIR_PATH`)
    pub keypair_path: Option<PathBuf>,

    /// Swap quote API base URL (`SWAP_API_BASE`)
    pub swap_api_base: String,

    /// Swap quote API key, sent as the `0x-api-key` header (`SWAP_API_KEY`)
    pub swap_api_key: Option<String>,

    /// Price feed API base URL (`PRICE_API_BASE`)
    pub price_api_base: String,

    /// How long to wait for confirmation before reporting an unknown outcome
    pub confirmation_timeout_secs: u64,

    /// Network-level resend attempts handed to the RPC node
    pub send_max_retries: usize,

    /// Quiet period before a quote is fetched after the last input change
    pub quote_debounce_ms: u64,

    /// Network stats polling interval
    pub stats_interval_secs: u64,

    /// Donation history polling interval
    pub history_interval_secs: u64,

    /// Number of recent signatures fetched for the history view
    pub history_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let recipient_address = get_env("DONATION_RECIPIENT")
            .map_err(|_| "DONATION_RECIPIENT must be set in environment")?;

        let network = get_env_or("SOLANA_NETWORK", "devnet").to_lowercase();

        Ok(Self {
            recipient_address,
            network,
            helius_api_key: get_env("HELIUS_API_KEY").ok(),
            rpc_url: get_env("SOLANA_RPC_URL").ok(),
            keypair_path: get_env("WALLET_KEYPAIR_PATH").ok().map(PathBuf::from),
            swap_api_base: get_env_or("SWAP_API_BASE", "https://base.api.0x.org/swap/v1"),
            swap_api_key: get_env("SWAP_API_KEY").ok(),
            price_api_base: get_env_or("PRICE_API_BASE", "https://api.coingecko.com/api/v3"),
            confirmation_timeout_secs: get_env_parse_or("CONFIRMATION_TIMEOUT_SECS", 30)
                .map_err(|e| format!("CONFIRMATION_TIMEOUT_SECS must be a valid number: {}", e))?,
            send_max_retries: get_env_parse_or("SEND_MAX_RETRIES", 5)
                .map_err(|e| format!("SEND_MAX_RETRIES must be a valid number: {}", e))?,
            quote_debounce_ms: get_env_parse_or("QUOTE_DEBOUNCE_MS", 500)
                .map_err(|e| format!("QUOTE_DEBOUNCE_MS must be a valid number: {}", e))?,
            stats_interval_secs: get_env_parse_or("STATS_INTERVAL_SECS", 60)
                .map_err(|e| format!("STATS_INTERVAL_SECS must be a valid number: {}", e))?,
            history_interval_secs: get_env_parse_or("HISTORY_INTERVAL_SECS", 30)
                .map_err(|e| format!("HISTORY_INTERVAL_SECS must be a valid number: {}", e))?,
            history_limit: get_env_parse_or("HISTORY_LIMIT", 10)
                .map_err(|e| format!("HISTORY_LIMIT must be a valid number: {}", e))?,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.recipient_address.len();
        if !(32..=44).contains(&len) {
            return Err("DONATION_RECIPIENT must be a base58 Solana address".to_string());
        }

        if self.network != "mainnet" && self.network != "devnet" {
            return Err(format!("SOLANA_NETWORK must be mainnet or devnet, got {}", self.network));
        }

        if self.confirmation_timeout_secs == 0 || self.confirmation_timeout_secs > 300 {
            return Err("CONFIRMATION_TIMEOUT_SECS must be between 1 and 300".to_string());
        }

        if self.stats_interval_secs == 0 || self.history_interval_secs == 0 {
            return Err("Polling intervals must be at least 1 second".to_string());
        }

        if self.history_limit == 0 || self.history_limit > 1000 {
            return Err("HISTORY_LIMIT must be between 1 and 1000".to_string());
        }

        Ok(())
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn quote_debounce(&self) -> Duration {
        Duration::from_millis(self.quote_debounce_ms)
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// Loads `.env` (if present), reads the environment and validates the result.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are missing or invalid
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<&'static Config, String> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())?;

    tracing::debug!("Configuration loaded");
    Ok(core_config())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG.get().expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            recipient_address: "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".to_string(),
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
    fn test_sample_config_is_valid() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(config.confirmation_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_unknown_network() {
        let config = Config { network: "testnet".into(), ..sample() };
        assert!(config.validate().unwrap_err().contains("SOLANA_NETWORK"));
    }

    #[test]
    fn test_rejects_short_recipient() {
        let config = Config { recipient_address: "abc".into(), ..sample() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = Config { confirmation_timeout_secs: 0, ..sample() };
        assert!(config.validate().is_err());
    }
}
