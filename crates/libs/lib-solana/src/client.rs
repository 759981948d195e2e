//! # Solana RPC Client
//!
//! Provides a high-level wrapper around the nonblocking Solana RPC client with
//! network management. Every method maps RPC failures into [`AppError`].
//!
//! ## Features
//!
//! - **Network Selection**: Easy switching between Mainnet and Devnet
//! - **Helius Integration**: Support for premium RPC endpoints with API keys
//! - **Balances and Fees**: Balance at a given commitment, fee for a compiled message
//! - **Submission**: Send with preflight options and RPC-side retries
//! - **Confirmation**: Blockhash + last-valid-block-height confirmation strategy
//! - **History and Stats**: Signatures, transactions, slot and performance samples
//!
//! ## RPC Endpoints
//!
//! ### Mainnet (with Helius API key)
//! - URL: `https://mainnet.helius-rpc.com/?api-key={key}`
//!
//! ### Mainnet (without API key)
//! - URL: `https://api.mainnet-beta.solana.com`
//! - Rate Limit: ~10 req/sec
//!
//! ### Devnet
//! - URL: `https://api.devnet.solana.com`
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_solana::client::{Network, SolanaClient};
//! use solana_sdk::commitment_config::CommitmentConfig;
//! use solana_sdk::pubkey::Pubkey;
//! use std::str::FromStr;
//!
//! # async fn example() -> lib_core::Result<()> {
//! let client = SolanaClient::builder().network(Network::Devnet).build();
//!
//! let pubkey = Pubkey::from_str("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin").unwrap();
//! let lamports = client.get_balance(&pubkey, CommitmentConfig::confirmed()).await?;
//! println!("Balance: {} lamports", lamports);
//! # Ok(())
//! # }
//! ```

use crate::types::{LatestBlockhash, SendOptions};
use lib_core::{AppError, Result};
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::{RpcSendTransactionConfig, RpcTransactionConfig};
use solana_client::rpc_response::{RpcConfirmedTransactionStatusWithSignature, RpcPerfSample};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use solana_transaction_status::{EncodedConfirmedTransactionWithStatusMeta, UiTransactionEncoding};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Delay between signature status polls while confirming.
const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Solana network selection.
///
/// - **Mainnet**: Production network with real economic value
/// - **Devnet**: Test network for development with free test tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// Solana mainnet-beta (production network)
    Mainnet,
    /// Solana devnet (test network)
    Devnet,
}

impl FromStr for Network {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Network::Mainnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(AppError::Config(format!("Unknown Solana network: {}", other))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Devnet => f.write_str("devnet"),
        }
    }
}

/// High-level Solana RPC client wrapper.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct SolanaClient {
    rpc: Arc<RpcClient>,
    network: Network,
    url: String,
}

/// Builder for configuring SolanaClient.
///
/// Allows fluent configuration of client settings before building.
#[derive(Debug, Clone)]
pub struct SolanaClientBuilder {
    network: Option<Network>,
    helius_api_key: Option<String>,
    custom_rpc_url: Option<String>,
}

impl Default for SolanaClientBuilder {
    fn default() -> Self {
        Self {
            network: Some(Network::Devnet),
            helius_api_key: None,
            custom_rpc_url: None,
        }
    }
}

impl SolanaClientBuilder {
    /// Set the Solana network.
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    /// Set the Helius API key for premium RPC access.
    pub fn helius_api_key(mut self, key: String) -> Self {
        self.helius_api_key = Some(key);
        self
    }

    /// Set a custom RPC URL (overrides network-based URL).
    pub fn custom_rpc_url(mut self, url: String) -> Self {
        self.custom_rpc_url = Some(url);
        self
    }

    /// Build the SolanaClient with configured settings.
    pub fn build(self) -> SolanaClient {
        let network = self.network.unwrap_or(Network::Devnet);
        let url = match self.custom_rpc_url {
            Some(custom_url) => custom_url,
            None => default_rpc_url(network, self.helius_api_key.as_deref()),
        };

        info!(%network, "🔗 Connecting to Solana RPC");
        let rpc = Arc::new(RpcClient::new(url.clone()));
        SolanaClient { rpc, network, url }
    }
}

fn default_rpc_url(network: Network, helius_api_key: Option<&str>) -> String {
    match network {
        Network::Mainnet => match helius_api_key {
            Some(key) => format!("https://mainnet.helius-rpc.com/?api-key={}", key),
            None => "https://api.mainnet-beta.solana.com".to_string(),
        },
        Network::Devnet => "https://api.devnet.solana.com".to_string(),
    }
}

/// A transaction whose blockhash has expired can never land, so expiry is an
/// execution failure rather than an unknown outcome.
fn check_blockhash_valid(block_height: u64, last_valid_block_height: u64, signature: &Signature) -> Result<()> {
    if block_height > last_valid_block_height {
        return Err(AppError::Execution(format!(
            "Blockhash expired at block height {} before {} was confirmed",
            block_height, signature
        )));
    }
    Ok(())
}

fn rpc_error(context: &str, err: ClientError) -> AppError {
    AppError::Network(format!("{}: {}", context, err))
}

impl SolanaClient {
    /// Create a new Solana RPC client using a builder for configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use lib_solana::client::{SolanaClient, Network};
    ///
    /// let client = SolanaClient::builder()
    ///     .network(Network::Mainnet)
    ///     .helius_api_key("your-api-key".to_string())
    ///     .build();
    /// ```
    pub fn builder() -> SolanaClientBuilder {
        SolanaClientBuilder::default()
    }

    /// Create a client from the loaded application configuration.
    pub fn from_config(config: &lib_core::Config) -> Result<Self> {
        let network = Network::from_str(&config.network)?;
        let mut builder = Self::builder().network(network);
        if let Some(key) = &config.helius_api_key {
            builder = builder.helius_api_key(key.clone());
        }
        if let Some(url) = &config.rpc_url {
            builder = builder.custom_rpc_url(url.clone());
        }
        Ok(builder.build())
    }

    /// Get the network this client is connected to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// RPC endpoint URL. May contain an API key, do not log it.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Balance of `pubkey` in lamports at the given commitment.
    pub async fn get_balance(&self, pubkey: &Pubkey, commitment: CommitmentConfig) -> Result<u64> {
        self.rpc
            .get_balance_with_commitment(pubkey, commitment)
            .await
            .map(|response| response.value)
            .map_err(|e| rpc_error("Failed to get balance", e))
    }

    /// Get the latest blockhash together with its last valid block height.
    ///
    /// Blockhashes expire after ~150 blocks (~60 seconds), so they should be
    /// fetched close to when the transaction will be submitted.
    pub async fn get_latest_blockhash(&self, commitment: CommitmentConfig) -> Result<LatestBlockhash> {
        let (blockhash, last_valid_block_height) = self
            .rpc
            .get_latest_blockhash_with_commitment(commitment)
            .await
            .map_err(|e| rpc_error("Failed to get latest blockhash", e))?;

        Ok(LatestBlockhash {
            blockhash,
            last_valid_block_height,
        })
    }

    /// Fee in lamports the network would charge for `message`.
    pub async fn get_fee_for_message(&self, message: &Message) -> Result<u64> {
        self.rpc
            .get_fee_for_message(message)
            .await
            .map_err(|e| rpc_error("Failed to estimate fees", e))
    }

    /// Send a signed transaction without waiting for confirmation.
    ///
    /// Retries beyond `options.max_retries` are left to the RPC node; this
    /// method never resends on its own.
    #[instrument(skip(self, transaction), fields(max_retries = options.max_retries))]
    pub async fn send_transaction(&self, transaction: &Transaction, options: SendOptions) -> Result<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: options.skip_preflight,
            preflight_commitment: Some(options.preflight_commitment),
            max_retries: Some(options.max_retries),
            ..Default::default()
        };

        let signature = self
            .rpc
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| rpc_error("Failed to send transaction", e))?;

        debug!(%signature, "Transaction submitted");
        Ok(signature)
    }

    /// Wait until `signature` reaches `commitment` or its blockhash expires.
    ///
    /// Returns `Ok(None)` on success and `Ok(Some(reason))` when the transaction
    /// landed with an on-chain error. Once the block height passes
    /// `last_valid_block_height` the transaction can no longer land and
    /// [`AppError::Execution`] is returned. This loop has no time limit of its
    /// own; callers race it against a timeout.
    #[instrument(skip(self, blockhash), fields(last_valid_block_height = blockhash.last_valid_block_height))]
    pub async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &LatestBlockhash,
        commitment: CommitmentConfig,
    ) -> Result<Option<String>> {
        loop {
            let statuses = self
                .rpc
                .get_signature_statuses(std::slice::from_ref(signature))
                .await
                .map_err(|e| rpc_error("Failed to get signature status", e))?;

            if let Some(Some(status)) = statuses.value.into_iter().next() {
                if let Some(err) = status.err {
                    warn!(%signature, error = %err, "Transaction failed on-chain");
                    return Ok(Some(err.to_string()));
                }
                if status.satisfies_commitment(commitment) {
                    debug!(%signature, slot = status.slot, "Transaction confirmed");
                    return Ok(None);
                }
            }

            let block_height = self
                .rpc
                .get_block_height()
                .await
                .map_err(|e| rpc_error("Failed to get block height", e))?;
            check_blockhash_valid(block_height, blockhash.last_valid_block_height, signature)?;

            tokio::time::sleep(CONFIRMATION_POLL_INTERVAL).await;
        }
    }

    /// Most recent signatures involving `pubkey`, newest first.
    pub async fn get_signatures_for_address(
        &self,
        pubkey: &Pubkey,
        limit: usize,
    ) -> Result<Vec<RpcConfirmedTransactionStatusWithSignature>> {
        let config = GetConfirmedSignaturesForAddress2Config {
            limit: Some(limit),
            ..Default::default()
        };
        self.rpc
            .get_signatures_for_address_with_config(pubkey, config)
            .await
            .map_err(|e| rpc_error("Failed to get signatures", e))
    }

    /// Fetch a confirmed transaction with its status metadata.
    pub async fn get_transaction(&self, signature: &Signature) -> Result<EncodedConfirmedTransactionWithStatusMeta> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        };
        self.rpc
            .get_transaction_with_config(signature, config)
            .await
            .map_err(|e| rpc_error("Failed to get transaction", e))
    }

    /// Current slot at the node's default commitment.
    pub async fn get_slot(&self) -> Result<u64> {
        self.rpc
            .get_slot()
            .await
            .map_err(|e| rpc_error("Failed to get slot", e))
    }

    /// Most recent performance samples, newest first.
    pub async fn get_recent_performance_samples(&self, limit: usize) -> Result<Vec<RpcPerfSample>> {
        self.rpc
            .get_recent_performance_samples(Some(limit))
            .await
            .map_err(|e| rpc_error("Failed to get performance samples", e))
    }

    /// Check if the RPC endpoint is healthy and responsive.
    pub async fn health_check(&self) -> Result<()> {
        self.rpc
            .get_version()
            .await
            .map_err(|e| rpc_error("Health check failed", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        assert_eq!(default_rpc_url(Network::Devnet, Some("key")), "https://api.devnet.solana.com");
        assert_eq!(default_rpc_url(Network::Mainnet, None), "https://api.mainnet-beta.solana.com");
        assert_eq!(
            default_rpc_url(Network::Mainnet, Some("abc")),
            "https://mainnet.helius-rpc.com/?api-key=abc"
        );
    }

    #[test]
    fn test_custom_url_overrides_network() {
        let client = SolanaClient::builder()
            .network(Network::Mainnet)
            .custom_rpc_url("http://127.0.0.1:8899".to_string())
            .build();
        assert_eq!(client.url(), "http://127.0.0.1:8899");
        assert_eq!(client.network(), Network::Mainnet);
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("devnet".parse::<Network>().unwrap(), Network::Devnet);
        assert!("testnet".parse::<Network>().is_err());
    }

    #[tokio::test]
    async fn test_unreachable_node_maps_to_network_error() {
        let client = SolanaClient::builder()
            .custom_rpc_url("http://127.0.0.1:1".to_string())
            .build();
        let err = client.get_slot().await.unwrap_err();
        assert_eq!(err.code(), "Network");
        assert!(err.to_string().contains("Failed to get slot"));
    }

    #[test]
    fn test_blockhash_expiry_is_execution_failure() {
        let signature = Signature::new_unique();
        assert!(check_blockhash_valid(999, 1_000, &signature).is_ok());
        assert!(check_blockhash_valid(1_000, 1_000, &signature).is_ok());

        let err = check_blockhash_valid(1_001, 1_000, &signature).unwrap_err();
        assert_eq!(err.code(), "Execution");
        assert!(!err.is_unknown_outcome());
        assert!(err.to_string().contains("Blockhash expired at block height 1001"));
    }
}
