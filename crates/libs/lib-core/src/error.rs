//! # Centralized Error Handling
//!
//! This module defines the error type [`AppError`] shared by the donation orchestrator,
//! the swap quote client and the widget layer. It follows the `thiserror` pattern for
//! ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Input Errors** - caught before any network call
//!    - [`Validation`](AppError::Validation): missing wallet, missing/unparseable amount
//!
//! 2. **Pre-flight Errors** - the transaction is never sent
//!    - [`InsufficientBalance`](AppError::InsufficientBalance): balance < amount + fee
//!
//! 3. **Network Errors** - any HTTP or RPC failure
//!    - [`Network`](AppError::Network)
//!
//! 4. **Outcome Errors** - the transaction was sent
//!    - [`Timeout`](AppError::Timeout): confirmation did not arrive in time, the
//!      transaction may still land (unknown outcome)
//!    - [`Execution`](AppError::Execution): the network rejected the transaction
//!
//! 5. **Internal Errors**
//!    - [`Config`](AppError::Config), [`Decoding`](AppError::Decoding),
//!      [`Internal`](AppError::Internal)
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn require_amount(amount: &str) -> Result<&str> {
//!     if amount.is_empty() {
//!         return Err(AppError::Validation(
//!             "Please connect your wallet and enter an amount".to_string()
//!         ));
//!     }
//!     Ok(amount)
//! }
//! ```

use thiserror::Error;

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error type covering every failure of the donation and swap flows.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid or missing user input (wallet not connected, bad amount).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wallet balance cannot cover the amount plus the estimated fee.
    #[error("{}", insufficient_balance_message(.required_lamports, .available_lamports))]
    InsufficientBalance {
        /// Amount plus estimated fee, in lamports
        required_lamports: u64,
        /// Balance observed at `confirmed` commitment, in lamports
        available_lamports: u64,
    },

    /// HTTP or RPC request failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Confirmation did not resolve within the allowed window.
    #[error("Transaction confirmation timeout for {signature}")]
    Timeout {
        /// Signature of the sent transaction, still worth checking on an explorer
        signature: String,
    },

    /// The transaction was processed but failed on-chain.
    #[error("Transaction failed: {0}")]
    Execution(String),

    /// Response or data decoding error.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn insufficient_balance_message(required: &u64, available: &u64) -> String {
    format!(
        "Insufficient balance. Required: {:.6} SOL (available: {:.6} SOL)",
        *required as f64 / LAMPORTS_PER_SOL as f64,
        *available as f64 / LAMPORTS_PER_SOL as f64,
    )
}

impl AppError {
    /// Short machine-readable code for the variant.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::Validation(_) => "Validation",
            AppError::InsufficientBalance { .. } => "InsufficientBalance",
            AppError::Network(_) => "Network",
            AppError::Timeout { .. } => "Timeout",
            AppError::Execution(_) => "Execution",
            AppError::Decoding(_) => "Decoding",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get a user-friendly error message, suitable for a toast.
    ///
    /// For internal errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::InsufficientBalance { .. } => self.to_string(),
            AppError::Network(msg) => msg.clone(),
            AppError::Timeout { signature } => format!(
                "Transaction confirmation timeout. It may still land, check {} on an explorer",
                signature
            ),
            AppError::Execution(_) => "Transaction failed".to_string(),
            AppError::Config(_) | AppError::Decoding(_) | AppError::Internal(_) => {
                "Failed to send donation. Please try again.".to_string()
            }
        }
    }

    /// Whether the transaction may still land even though this error was returned.
    pub fn is_unknown_outcome(&self) -> bool {
        matches!(self, AppError::Timeout { .. })
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_balance_message_reports_required_total() {
        let err = AppError::InsufficientBalance {
            required_lamports: 4_999_999_999 + 5_000,
            available_lamports: 5_000_000_000,
        };
        let msg = err.user_message();
        assert!(msg.contains("Required: 5.000005 SOL"), "{msg}");
        assert!(msg.contains("available: 5.000000 SOL"), "{msg}");
    }

    #[test]
    fn test_only_timeout_is_unknown_outcome() {
        assert!(AppError::Timeout { signature: "sig".into() }.is_unknown_outcome());
        assert!(!AppError::Execution("custom program error".into()).is_unknown_outcome());
        assert!(!AppError::Network("connection refused".into()).is_unknown_outcome());
    }

    #[test]
    fn test_internal_errors_are_not_exposed() {
        let err = AppError::Internal("poisoned lock at widget.rs:42".into());
        assert!(!err.user_message().contains("widget.rs"));
        assert_eq!(err.code(), "Internal");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: AppError = serde_json::from_str::<u64>("nope").unwrap_err().into();
        assert_eq!(err.code(), "Decoding");
    }
}
