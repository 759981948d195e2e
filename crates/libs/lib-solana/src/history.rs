//! # Donation History
//!
//! Recent transfers to the donation address and their aggregates. The history is
//! rebuilt from the chain on every poll and kept in memory only.
//!
//! The amount of a transaction is the absolute balance change of its first
//! account (the fee payer), which for a plain donation is the amount plus fee.

use crate::client::SolanaClient;
use crate::types::{DonationSummary, TransactionHistoryEntry};
use lib_core::Result;
use lib_utils::time::from_unix_seconds;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Fetch the last `limit` transactions involving `recipient`, newest first.
///
/// Transactions with an unparseable signature, without balance metadata, or that
/// cannot be fetched are skipped.
#[instrument(skip(client), fields(%recipient))]
pub async fn fetch_history(
    client: &SolanaClient,
    recipient: &Pubkey,
    limit: usize,
) -> Result<Vec<TransactionHistoryEntry>> {
    let signatures = client.get_signatures_for_address(recipient, limit).await?;
    let mut entries = Vec::with_capacity(signatures.len());

    for status in signatures {
        let signature = match Signature::from_str(&status.signature) {
            Ok(signature) => signature,
            Err(e) => {
                debug!(signature = %status.signature, error = %e, "Skipping unparseable signature");
                continue;
            }
        };

        let transaction = match client.get_transaction(&signature).await {
            Ok(transaction) => transaction,
            Err(e) => {
                debug!(%signature, error = %e, "Skipping transaction");
                continue;
            }
        };

        let entry = transaction.transaction.meta.as_ref().and_then(|meta| {
            entry_from_balances(status.signature.clone(), &meta.pre_balances, &meta.post_balances, status.block_time)
        });
        entries.extend(entry);
    }

    debug!(count = entries.len(), "History refreshed");
    Ok(entries)
}

/// Build an entry from pre/post balances, `None` when either list is empty.
pub fn entry_from_balances(
    signature: String,
    pre_balances: &[u64],
    post_balances: &[u64],
    block_time: Option<i64>,
) -> Option<TransactionHistoryEntry> {
    let pre = *pre_balances.first()?;
    let post = *post_balances.first()?;

    Some(TransactionHistoryEntry {
        signature,
        amount_lamports: post.abs_diff(pre),
        timestamp: block_time.and_then(from_unix_seconds),
    })
}

/// Totals over a history list. Donors are counted by distinct signature.
pub fn summarize(entries: &[TransactionHistoryEntry]) -> DonationSummary {
    let donors: HashSet<&str> = entries.iter().map(|e| e.signature.as_str()).collect();

    DonationSummary {
        total_lamports: entries.iter().map(|e| e.amount_lamports).sum(),
        donor_count: donors.len(),
        transaction_count: entries.len(),
    }
}
