//! # Donation Type Definitions
//!
//! Common data structures shared by the fee estimator, the orchestrator, the
//! polling loops and the widget layer.
//!
//! ## Type Categories
//!
//! ### Transaction inputs
//! - [`PriorityTier`]: user-selected transaction speed
//! - [`LatestBlockhash`]: recent checkpoint with its validity window
//! - [`SendOptions`]: submission options handed to the wallet
//!
//! ### Read models
//! - [`TransactionHistoryEntry`] / [`DonationSummary`]: recent donations
//! - [`NetworkStats`]: slot, block time and SOL price
//! - [`PriceData`]: a cached spot price with its source

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::hash::Hash;

/// Transaction speed selected by the donor.
///
/// Each tier maps to a fixed fee rate; the compute-unit price attached to the
/// transaction is `rate * 1_000_000` micro-lamports. `Low` attaches no
/// priority-fee instruction at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl PriorityTier {
    /// All tiers in display order.
    pub fn all() -> &'static [PriorityTier] {
        &[PriorityTier::Low, PriorityTier::Medium, PriorityTier::High]
    }

    /// Fixed fee-rate constant for the tier.
    pub fn fee_rate(&self) -> u64 {
        match self {
            PriorityTier::Low => 1,
            PriorityTier::Medium => 5,
            PriorityTier::High => 10,
        }
    }

    /// Compute-unit price in micro-lamports, or `None` when no priority
    /// instruction should be attached.
    pub fn compute_unit_price(&self) -> Option<u64> {
        match self {
            PriorityTier::Low => None,
            tier => Some(tier.fee_rate() * 1_000_000),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityTier::Low => "Low Priority (~30s)",
            PriorityTier::Medium => "Medium Priority (~15s)",
            PriorityTier::High => "High Priority (~5s)",
        }
    }
}

/// A recent blockhash and the last block height at which it is still valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBlockhash {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Options used when handing a transaction to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Skip the RPC node's simulation before forwarding
    pub skip_preflight: bool,
    /// Commitment used for the preflight simulation
    pub preflight_commitment: CommitmentLevel,
    /// Resend attempts performed by the RPC node itself
    pub max_retries: usize,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            preflight_commitment: CommitmentLevel::Confirmed,
            max_retries: 5,
        }
    }
}

/// One past transaction to the donation address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionHistoryEntry {
    /// Base58 transaction signature
    pub signature: String,
    /// Absolute balance change of the first account, in lamports
    pub amount_lamports: u64,
    /// Block time, when the node reported one
    pub timestamp: Option<DateTime<Utc>>,
}

impl TransactionHistoryEntry {
    pub fn amount_sol(&self) -> f64 {
        self.amount_lamports as f64 / lib_core::LAMPORTS_PER_SOL as f64
    }
}

/// Aggregates over the recent donation history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DonationSummary {
    pub total_lamports: u64,
    pub donor_count: usize,
    pub transaction_count: usize,
}

impl DonationSummary {
    pub fn total_sol(&self) -> f64 {
        self.total_lamports as f64 / lib_core::LAMPORTS_PER_SOL as f64
    }
}

/// Snapshot of network conditions shown above the donation form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub current_slot: u64,
    /// Sample period of the most recent performance sample, in seconds
    pub average_block_time: f64,
    /// SOL price in USD
    pub sol_price: f64,
}

/// Price data for a single asset with metadata.
///
/// # Fields
///
/// * `price` - Current price in USD
/// * `source` - Data source identifier (e.g., "coingecko")
/// * `last_updated` - Unix timestamp of when this price was last updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    pub price: f64,
    pub source: String,
    pub last_updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_tiers() {
        assert_eq!(PriorityTier::default(), PriorityTier::Medium);
        assert_eq!(PriorityTier::Low.compute_unit_price(), None);
        assert_eq!(PriorityTier::Medium.compute_unit_price(), Some(5_000_000));
        assert_eq!(PriorityTier::High.compute_unit_price(), Some(10_000_000));
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        let json = serde_json::to_string(&PriorityTier::High).unwrap();
        assert_eq!(json, "\"high\"");
    }

    #[test]
    fn test_default_send_options() {
        let opts = SendOptions::default();
        assert!(!opts.skip_preflight);
        assert_eq!(opts.preflight_commitment, CommitmentLevel::Confirmed);
        assert_eq!(opts.max_retries, 5);
    }
}
