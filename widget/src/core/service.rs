//! # Service Traits
//!
//! Traits for dependency injection, so the widgets can be driven by the real
//! network clients in the host and by in-memory doubles in tests.

use async_trait::async_trait;
use lib_core::Result;
use lib_solana::history::fetch_history;
use lib_solana::stats::fetch_network_stats;
use lib_solana::swap::{PriceResponse, QuoteResponse, SwapClient, SwapParams};
use lib_solana::{NetworkStats, SolanaState, TransactionHistoryEntry};

/// Trait for swap quote operations
#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Indicative price, used while the user is typing
    async fn get_price(&self, params: &SwapParams) -> Result<PriceResponse>;

    /// Firm quote with transaction data
    async fn get_quote(&self, params: &SwapParams) -> Result<QuoteResponse>;
}

#[async_trait]
impl QuoteService for SwapClient {
    async fn get_price(&self, params: &SwapParams) -> Result<PriceResponse> {
        SwapClient::get_price(self, params).await
    }

    async fn get_quote(&self, params: &SwapParams) -> Result<QuoteResponse> {
        SwapClient::get_quote(self, params).await
    }
}

/// Trait for the read-only data shown around the donation form
#[async_trait]
pub trait NetworkFeed: Send + Sync {
    async fn network_stats(&self) -> Result<NetworkStats>;

    /// Recent transactions to the donation address, newest first
    async fn donation_history(&self, limit: usize) -> Result<Vec<TransactionHistoryEntry>>;
}

#[async_trait]
impl NetworkFeed for SolanaState {
    async fn network_stats(&self) -> Result<NetworkStats> {
        fetch_network_stats(&self.rpc, &self.price_cache).await
    }

    async fn donation_history(&self, limit: usize) -> Result<Vec<TransactionHistoryEntry>> {
        fetch_history(&self.rpc, &self.recipient, limit).await
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory service doubles shared by the widget tests.

    use super::*;
    use lib_core::AppError;
    use lib_solana::types::{LatestBlockhash, SendOptions};
    use lib_solana::WalletProvider;
    use parking_lot::Mutex;
    use solana_sdk::commitment_config::CommitmentConfig;
    use solana_sdk::hash::Hash;
    use solana_sdk::message::Message;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::Signature;
    use solana_sdk::transaction::Transaction;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    pub struct MockWallet {
        pub pubkey: Pubkey,
        pub connected: Mutex<bool>,
        pub balance: u64,
        pub fee: u64,
        /// When set, confirmation waits for a notification
        pub gate: Option<Arc<Notify>>,
        pub on_chain_error: Option<String>,
        pub send_calls: AtomicUsize,
        pub fee_calls: AtomicUsize,
    }

    impl MockWallet {
        pub fn funded(balance: u64, fee: u64) -> Self {
            Self {
                pubkey: Pubkey::new_unique(),
                connected: Mutex::new(true),
                balance,
                fee,
                gate: None,
                on_chain_error: None,
                send_calls: AtomicUsize::new(0),
                fee_calls: AtomicUsize::new(0),
            }
        }

        pub fn disconnected(balance: u64, fee: u64) -> Self {
            let wallet = Self::funded(balance, fee);
            *wallet.connected.lock() = false;
            wallet
        }

        pub fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        pub fn sends(&self) -> usize {
            self.send_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WalletProvider for MockWallet {
        fn public_key(&self) -> Option<Pubkey> {
            self.connected.lock().then_some(self.pubkey)
        }

        async fn connect(&self) -> Result<Pubkey> {
            *self.connected.lock() = true;
            Ok(self.pubkey)
        }

        async fn disconnect(&self) -> Result<()> {
            *self.connected.lock() = false;
            Ok(())
        }

        async fn get_balance(&self, _pubkey: &Pubkey, _commitment: CommitmentConfig) -> Result<u64> {
            Ok(self.balance)
        }

        async fn get_latest_blockhash(&self, _commitment: CommitmentConfig) -> Result<LatestBlockhash> {
            Ok(LatestBlockhash {
                blockhash: Hash::new_unique(),
                last_valid_block_height: 1_000,
            })
        }

        async fn get_fee_for_message(&self, _message: &Message) -> Result<u64> {
            self.fee_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.fee)
        }

        async fn send_transaction(&self, _transaction: Transaction, _options: SendOptions) -> Result<Signature> {
            self.send_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Signature::new_unique())
        }

        async fn confirm_transaction(
            &self,
            _signature: &Signature,
            _blockhash: &LatestBlockhash,
        ) -> Result<Option<String>> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(self.on_chain_error.clone())
        }
    }

    /// Quote double that answers `get_price` with `buy_amount = sell_amount * rate`.
    pub struct MockQuotes {
        pub rate: u128,
        pub error: Option<String>,
        pub price_calls: Mutex<Vec<SwapParams>>,
        pub quote_calls: AtomicUsize,
    }

    impl MockQuotes {
        pub fn with_rate(rate: u128) -> Self {
            Self {
                rate,
                error: None,
                price_calls: Mutex::new(Vec::new()),
                quote_calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                error: Some(message.to_string()),
                ..Self::with_rate(0)
            }
        }

        pub fn calls(&self) -> Vec<SwapParams> {
            self.price_calls.lock().clone()
        }

        fn respond(&self, params: &SwapParams) -> Result<PriceResponse> {
            if let Some(message) = &self.error {
                return Err(AppError::Network(message.clone()));
            }
            let sell: u128 = params
                .sell_amount
                .as_deref()
                .unwrap_or("0")
                .parse()
                .map_err(|_| AppError::Decoding("bad sell amount".into()))?;
            Ok(PriceResponse {
                price: self.rate.to_string(),
                sell_amount: sell.to_string(),
                buy_amount: (sell * self.rate).to_string(),
                ..Default::default()
            })
        }
    }

    #[async_trait]
    impl QuoteService for MockQuotes {
        async fn get_price(&self, params: &SwapParams) -> Result<PriceResponse> {
            self.price_calls.lock().push(params.clone());
            self.respond(params)
        }

        async fn get_quote(&self, params: &SwapParams) -> Result<QuoteResponse> {
            self.quote_calls.fetch_add(1, Ordering::SeqCst);
            let price = self.respond(params)?;
            Ok(QuoteResponse {
                price,
                to: "0xdef1".into(),
                ..Default::default()
            })
        }
    }

    /// Network feed returning fixed data and counting calls.
    #[derive(Default)]
    pub struct MockFeed {
        pub stats_calls: AtomicUsize,
        pub history_calls: AtomicUsize,
        pub history: Vec<TransactionHistoryEntry>,
        /// When set, every call fails with a network error.
        pub failing: AtomicBool,
    }

    impl MockFeed {
        pub fn stats_calls(&self) -> usize {
            self.stats_calls.load(Ordering::SeqCst)
        }

        pub fn history_calls(&self) -> usize {
            self.history_calls.load(Ordering::SeqCst)
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Network("rpc unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl NetworkFeed for MockFeed {
        async fn network_stats(&self) -> Result<NetworkStats> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(NetworkStats {
                current_slot: 42,
                average_block_time: 60.0,
                sol_price: 150.0,
            })
        }

        async fn donation_history(&self, limit: usize) -> Result<Vec<TransactionHistoryEntry>> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(self.history.iter().take(limit).cloned().collect())
        }
    }
}
