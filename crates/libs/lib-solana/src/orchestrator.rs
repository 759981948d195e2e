//! # Submission & Confirmation Orchestrator
//!
//! Drives a single donation from validated input to a terminal state:
//!
//! ```text
//! Idle -> Estimating -> Submitting -> AwaitingConfirmation -> Confirmed
//!   ^         |              |                 |          \-> Failed
//!   |         v              v                 v           \-> TimedOut
//!   |       Failed         Failed            Failed
//!   \-- validation error
//! ```
//!
//! - The balance is read at `confirmed` commitment and must cover amount + fee,
//!   otherwise the transaction is never sent.
//! - The transaction is sent once; resends are delegated to the RPC node via
//!   `max_retries`.
//! - Confirmation is raced against a timeout. Losing the race reports
//!   [`AppError::Timeout`], which means the outcome is unknown, not failed.
//!
//! The current phase is readable through a `tokio::sync::watch` channel. A
//! caller that needs every transition, not just the latest, passes a progress
//! sender to [`DonationOrchestrator::donate_with_progress`].

use crate::builder::{DonationRequest, TransactionDraft};
use crate::fee::fee_for_draft;
use crate::types::{PriorityTier, SendOptions};
use crate::units::parse_lamports;
use crate::wallet::WalletProvider;
use lib_core::{AppError, Config, Result};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{info, instrument, warn};

/// Where a donation currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DonationPhase {
    #[default]
    Idle,
    Estimating,
    Submitting,
    AwaitingConfirmation { signature: String },
    Confirmed { signature: String },
    Failed { reason: String },
    /// Confirmation did not arrive in time; the transaction may still land.
    TimedOut { signature: String },
}

impl DonationPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DonationPhase::Confirmed { .. } | DonationPhase::Failed { .. } | DonationPhase::TimedOut { .. }
        )
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            DonationPhase::Estimating | DonationPhase::Submitting | DonationPhase::AwaitingConfirmation { .. }
        )
    }
}

/// Tunables for submission and confirmation.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    pub confirmation_timeout: Duration,
    pub send_options: SendOptions,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            confirmation_timeout: Duration::from_secs(30),
            send_options: SendOptions::default(),
        }
    }
}

impl From<&Config> for OrchestratorSettings {
    fn from(config: &Config) -> Self {
        Self {
            confirmation_timeout: config.confirmation_timeout(),
            send_options: SendOptions {
                max_retries: config.send_max_retries,
                ..SendOptions::default()
            },
        }
    }
}

pub struct DonationOrchestrator {
    wallet: Arc<dyn WalletProvider>,
    recipient: Pubkey,
    settings: OrchestratorSettings,
    phase: watch::Sender<DonationPhase>,
}

impl DonationOrchestrator {
    pub fn new(wallet: Arc<dyn WalletProvider>, recipient: Pubkey, settings: OrchestratorSettings) -> Self {
        let (phase, _) = watch::channel(DonationPhase::Idle);
        Self {
            wallet,
            recipient,
            settings,
            phase,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DonationPhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> DonationPhase {
        self.phase.borrow().clone()
    }

    pub fn recipient(&self) -> &Pubkey {
        &self.recipient
    }

    fn set_phase(&self, phase: DonationPhase, progress: Option<&mpsc::UnboundedSender<DonationPhase>>) {
        if let Some(progress) = progress {
            let _ = progress.send(phase.clone());
        }
        self.phase.send_replace(phase);
    }

    /// Run one donation to completion.
    ///
    /// The returned error is also reflected in the final phase: validation errors
    /// return to `Idle`, a lost confirmation race ends in `TimedOut`, everything
    /// else ends in `Failed`.
    pub async fn donate(&self, amount: &str, tier: PriorityTier, memo: &str) -> Result<Signature> {
        self.donate_with_progress(amount, tier, memo, None).await
    }

    /// Like [`donate`](Self::donate), but also sends every phase transition,
    /// terminal phase included, to `progress`. The sender is dropped when the
    /// donation ends, which closes the receiver.
    #[instrument(skip(self, memo, progress), fields(recipient = %self.recipient))]
    pub async fn donate_with_progress(
        &self,
        amount: &str,
        tier: PriorityTier,
        memo: &str,
        progress: Option<mpsc::UnboundedSender<DonationPhase>>,
    ) -> Result<Signature> {
        let result = self.run(amount, tier, memo, progress.as_ref()).await;

        let terminal = match &result {
            Ok(signature) => {
                info!(%signature, "Donation confirmed");
                DonationPhase::Confirmed {
                    signature: signature.to_string(),
                }
            }
            Err(AppError::Validation(msg)) => {
                warn!(reason = %msg, "Donation rejected");
                DonationPhase::Idle
            }
            Err(AppError::Timeout { signature }) => {
                warn!(%signature, "Confirmation timed out, outcome unknown");
                DonationPhase::TimedOut {
                    signature: signature.clone(),
                }
            }
            Err(e) => {
                warn!(error = %e, "Donation failed");
                DonationPhase::Failed {
                    reason: e.user_message(),
                }
            }
        };
        self.set_phase(terminal, progress.as_ref());

        result
    }

    async fn run(
        &self,
        amount: &str,
        tier: PriorityTier,
        memo: &str,
        progress: Option<&mpsc::UnboundedSender<DonationPhase>>,
    ) -> Result<Signature> {
        let payer = match self.wallet.public_key() {
            Some(payer) if !amount.is_empty() => payer,
            _ => {
                return Err(AppError::Validation(
                    "Please connect your wallet and enter an amount".to_string(),
                ))
            }
        };
        let lamports = parse_lamports(amount)?;
        if lamports == 0 {
            return Err(AppError::Validation("Amount must be greater than zero".to_string()));
        }

        self.set_phase(DonationPhase::Estimating, progress);

        let blockhash = self
            .wallet
            .get_latest_blockhash(CommitmentConfig::finalized())
            .await?;
        let balance = self
            .wallet
            .get_balance(&payer, CommitmentConfig::confirmed())
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

        let required = lamports.saturating_add(fee);
        if balance < required {
            return Err(AppError::InsufficientBalance {
                required_lamports: required,
                available_lamports: balance,
            });
        }

        self.set_phase(DonationPhase::Submitting, progress);
        let signature = self
            .wallet
            .send_transaction(draft.into_transaction(), self.settings.send_options)
            .await?;

        self.set_phase(
            DonationPhase::AwaitingConfirmation {
                signature: signature.to_string(),
            },
            progress,
        );

        let confirmation = self.wallet.confirm_transaction(&signature, &blockhash);
        match tokio::time::timeout(self.settings.confirmation_timeout, confirmation).await {
            Err(_elapsed) => Err(AppError::Timeout {
                signature: signature.to_string(),
            }),
            Ok(Ok(None)) => Ok(signature),
            Ok(Ok(Some(reason))) => Err(AppError::Execution(reason)),
            Ok(Err(e)) => Err(e),
        }
    }
}
