//! # Application Events
//!
//! Event types sent from widget tasks to the host over an `async_channel`.

use lib_solana::swap::PriceResponse;
use lib_solana::{DonationPhase, DonationSummary, NetworkStats, TransactionHistoryEntry};

/// Severity of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    /// Shown while a long-running step is pending
    Loading,
    Success,
    Error,
}

/// Async task results sent to the host
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// User-facing notification
    Toast { level: ToastLevel, message: String },
    /// Wallet connected, with its base58 address
    WalletConnected(String),
    /// Fee estimate in lamports, `None` when it could not be computed
    FeeEstimated(Option<u64>),
    /// Donation progressed to a new phase
    DonationPhaseChanged(DonationPhase),
    /// Indicative swap price received
    QuoteUpdated(Result<PriceResponse, String>),
    /// Network stats refreshed
    NetworkStatsUpdated(NetworkStats),
    /// Donation history refreshed
    HistoryUpdated {
        entries: Vec<TransactionHistoryEntry>,
        summary: DonationSummary,
    },
}

impl AppEvent {
    pub fn toast(level: ToastLevel, message: impl Into<String>) -> Self {
        AppEvent::Toast {
            level,
            message: message.into(),
        }
    }
}
