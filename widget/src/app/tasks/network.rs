//! # Network Refresh Tasks
//!
//! Tick bodies for the donation widget's polling loops. Failures are logged and
//! the last known values stay on screen.

use crate::app::events::AppEvent;
use crate::app::state::DonationState;
use crate::core::service::NetworkFeed;
use async_channel::Sender;
use lib_solana::history::summarize;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetch network stats and publish them.
pub(crate) async fn refresh_stats(
    feed: Arc<dyn NetworkFeed>,
    state: Arc<RwLock<DonationState>>,
    event_tx: Sender<AppEvent>,
) {
    match feed.network_stats().await {
        Ok(stats) => {
            state.write().network_stats = Some(stats);
            debug!(slot = stats.current_slot, sol_price = stats.sol_price, "Network stats updated");
            let _ = event_tx.send(AppEvent::NetworkStatsUpdated(stats)).await;
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch network stats - keeping last known values");
        }
    }
}

/// Fetch donation history, recompute the summary and publish both.
pub(crate) async fn refresh_history(
    feed: Arc<dyn NetworkFeed>,
    limit: usize,
    state: Arc<RwLock<DonationState>>,
    event_tx: Sender<AppEvent>,
) {
    match feed.donation_history(limit).await {
        Ok(entries) => {
            let summary = summarize(&entries);
            {
                let mut state = state.write();
                state.history = entries.clone();
                state.summary = summary;
            } // Lock released here

            debug!(count = entries.len(), total_lamports = summary.total_lamports, "Donation history updated");
            let _ = event_tx.send(AppEvent::HistoryUpdated { entries, summary }).await;
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch donation history - keeping last known values");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::mock::MockFeed;
    use lib_solana::TransactionHistoryEntry;

    fn entry(signature: &str, amount_lamports: u64) -> TransactionHistoryEntry {
        TransactionHistoryEntry {
            signature: signature.into(),
            amount_lamports,
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_refresh_history_updates_state_and_summary() {
        let feed = Arc::new(MockFeed {
            history: vec![entry("a", 1_000_000_000), entry("b", 250_000_000), entry("c", 1)],
            ..Default::default()
        });
        let state = Arc::new(RwLock::new(DonationState::default()));
        let (tx, rx) = async_channel::unbounded();

        refresh_history(feed.clone(), 2, Arc::clone(&state), tx).await;

        let state = state.read();
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.summary.total_lamports, 1_250_000_000);
        assert_eq!(state.summary.donor_count, 2);
        assert!(matches!(rx.try_recv(), Ok(AppEvent::HistoryUpdated { .. })));
    }

    #[tokio::test]
    async fn test_refresh_stats() {
        let feed = Arc::new(MockFeed::default());
        let state = Arc::new(RwLock::new(DonationState::default()));
        let (tx, rx) = async_channel::unbounded();

        refresh_stats(feed.clone(), Arc::clone(&state), tx).await;

        assert_eq!(state.read().network_stats.map(|s| s.current_slot), Some(42));
        assert!(matches!(rx.try_recv(), Ok(AppEvent::NetworkStatsUpdated(_))));
        assert_eq!(feed.stats_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_ticks_keep_last_known_values() {
        let feed = Arc::new(MockFeed {
            history: vec![entry("a", 500), entry("b", 700)],
            ..Default::default()
        });
        let state = Arc::new(RwLock::new(DonationState::default()));
        let (tx, rx) = async_channel::unbounded();

        refresh_stats(feed.clone(), Arc::clone(&state), tx.clone()).await;
        refresh_history(feed.clone(), 10, Arc::clone(&state), tx.clone()).await;
        assert_eq!(rx.len(), 2);

        feed.set_failing(true);
        refresh_stats(feed.clone(), Arc::clone(&state), tx.clone()).await;
        refresh_history(feed.clone(), 10, Arc::clone(&state), tx).await;

        assert_eq!(feed.stats_calls(), 2);
        assert_eq!(feed.history_calls(), 2);
        assert_eq!(rx.len(), 2);
        let state = state.read();
        assert_eq!(state.network_stats.map(|s| s.current_slot), Some(42));
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.summary.total_lamports, 1_200);
    }
}
