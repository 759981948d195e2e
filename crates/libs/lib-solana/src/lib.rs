//! # Solana Library
//!
//! Solana donation flow (amount parsing, fee estimation, transaction building,
//! submission and confirmation), donation history and network stats, spot prices,
//! and the swap quote API client.

// Declare all modules
pub mod builder;
pub mod cache;
pub mod client;
pub mod fee;
pub mod history;
pub mod orchestrator;
pub mod price_feed;
pub mod state;
pub mod stats;
pub mod swap;
pub mod types;
pub mod units;
pub mod wallet;

// Re-export commonly used types from root for convenience
pub use client::{Network, SolanaClient};
pub use orchestrator::{DonationOrchestrator, DonationPhase, OrchestratorSettings};
pub use state::SolanaState;
pub use types::{DonationSummary, LatestBlockhash, NetworkStats, PriorityTier, SendOptions, TransactionHistoryEntry};
pub use wallet::{KeypairWallet, WalletProvider};
