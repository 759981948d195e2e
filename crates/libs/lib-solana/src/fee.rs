//! # Fee Estimator
//!
//! Estimates the network fee for the donation the user is about to send. The
//! estimate covers the full draft (priority instruction and memo included) built
//! against a `finalized` blockhash.

use crate::builder::{DonationRequest, TransactionDraft};
use crate::types::PriorityTier;
use crate::units::parse_lamports;
use crate::wallet::WalletProvider;
use lib_core::{AppError, Result};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Fee for an already-built draft.
pub async fn fee_for_draft(wallet: &dyn WalletProvider, draft: &TransactionDraft) -> Result<u64> {
    wallet.get_fee_for_message(&draft.message()).await
}

pub struct FeeEstimator {
    wallet: Arc<dyn WalletProvider>,
    recipient: Pubkey,
}

impl FeeEstimator {
    pub fn new(wallet: Arc<dyn WalletProvider>, recipient: Pubkey) -> Self {
        Self { wallet, recipient }
    }

    /// Estimate the fee, in lamports, for donating `amount` SOL.
    #[instrument(skip(self, memo))]
    pub async fn estimate(&self, amount: &str, tier: PriorityTier, memo: &str) -> Result<u64> {
        let payer = self
            .wallet
            .public_key()
            .ok_or_else(|| AppError::Validation("Wallet is not connected".to_string()))?;
        let lamports = parse_lamports(amount)?;

        let blockhash = self
            .wallet
            .get_latest_blockhash(CommitmentConfig::finalized())
            .await?;

        let request = DonationRequest {
            payer,
            recipient: self.recipient,
            lamports,
            tier,
            memo: memo.to_string(),
        };
        let draft = TransactionDraft::new(&request, blockhash);
        let fee = fee_for_draft(self.wallet.as_ref(), &draft).await?;

        debug!(fee, "Fee estimated");
        Ok(fee)
    }

    /// Like [`estimate`](Self::estimate) but any failure clears the estimate.
    pub async fn estimate_or_clear(&self, amount: &str, tier: PriorityTier, memo: &str) -> Option<u64> {
        match self.estimate(amount, tier, memo).await {
            Ok(fee) => Some(fee),
            Err(e) => {
                debug!(error = %e, "Fee estimate unavailable");
                None
            }
        }
    }
}
