//! # Donation Widget
//!
//! Owns the donation form state and wires it to the fee estimator, the
//! orchestrator and the polling loops.
//!
//! - Fee estimates run in a background task that is replaced on every input
//!   change; failures clear the estimate.
//! - One donation at a time: [`DonationWidget::donate`] returns `None` while a
//!   previous call is still in flight. Dropping the `donate` future releases
//!   the widget again.
//! - Inputs are cleared only after a confirmed donation. Failed and timed-out
//!   attempts keep the amount and memo so the user can retry.

use crate::app::events::{AppEvent, ToastLevel};
use crate::app::state::DonationState;
use crate::app::tasks::network::{refresh_history, refresh_stats};
use crate::app::tasks::PollingTask;
use crate::core::service::NetworkFeed;
use async_channel::Sender;
use lib_core::{Config, Result};
use lib_solana::builder::MAX_MEMO_CHARS;
use lib_solana::fee::FeeEstimator;
use lib_solana::{DonationOrchestrator, DonationPhase, OrchestratorSettings, PriorityTier, WalletProvider};
use lib_utils::validation::{is_decimal_input, truncate_chars};
use parking_lot::{Mutex, RwLock};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Timing and sizing knobs for the donation widget.
#[derive(Debug, Clone, Copy)]
pub struct DonationWidgetSettings {
    pub orchestrator: OrchestratorSettings,
    pub stats_interval: Duration,
    pub history_interval: Duration,
    pub history_limit: usize,
}

impl Default for DonationWidgetSettings {
    fn default() -> Self {
        Self {
            orchestrator: OrchestratorSettings::default(),
            stats_interval: Duration::from_secs(60),
            history_interval: Duration::from_secs(30),
            history_limit: 10,
        }
    }
}

impl From<&Config> for DonationWidgetSettings {
    fn from(config: &Config) -> Self {
        Self {
            orchestrator: OrchestratorSettings::from(config),
            stats_interval: Duration::from_secs(config.stats_interval_secs),
            history_interval: Duration::from_secs(config.history_interval_secs),
            history_limit: config.history_limit,
        }
    }
}

pub struct DonationWidget {
    state: Arc<RwLock<DonationState>>,
    wallet: Arc<dyn WalletProvider>,
    feed: Arc<dyn NetworkFeed>,
    orchestrator: DonationOrchestrator,
    estimator: Arc<FeeEstimator>,
    settings: DonationWidgetSettings,
    event_tx: Sender<AppEvent>,
    fee_task: Mutex<Option<JoinHandle<()>>>,
    polling: Mutex<Vec<PollingTask>>,
}

impl DonationWidget {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        feed: Arc<dyn NetworkFeed>,
        recipient: Pubkey,
        settings: DonationWidgetSettings,
        event_tx: Sender<AppEvent>,
    ) -> Self {
        let state = DonationState {
            wallet: wallet.public_key(),
            ..Default::default()
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            orchestrator: DonationOrchestrator::new(Arc::clone(&wallet), recipient, settings.orchestrator),
            estimator: Arc::new(FeeEstimator::new(Arc::clone(&wallet), recipient)),
            wallet,
            feed,
            settings,
            event_tx,
            fee_task: Mutex::new(None),
            polling: Mutex::new(Vec::new()),
        }
    }

    /// Shared handle to the form state, for rendering.
    pub fn state(&self) -> Arc<RwLock<DonationState>> {
        Arc::clone(&self.state)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> DonationState {
        self.state.read().clone()
    }

    pub fn recipient(&self) -> &Pubkey {
        self.orchestrator.recipient()
    }

    // region: --- Inputs

    /// Update the amount. Returns `false` (and leaves the amount untouched) for
    /// anything that is not a partial decimal number.
    pub fn set_amount(&self, value: &str) -> bool {
        if !is_decimal_input(value) {
            return false;
        }
        self.state.write().amount = value.to_string();
        self.refresh_fee();
        true
    }

    /// Update the memo, capped at the on-chain memo length.
    pub fn set_memo(&self, value: &str) {
        self.state.write().memo = truncate_chars(value, MAX_MEMO_CHARS).to_string();
    }

    pub fn set_tier(&self, tier: PriorityTier) {
        self.state.write().tier = tier;
        self.refresh_fee();
    }

    pub async fn connect_wallet(&self) -> Result<Pubkey> {
        match self.wallet.connect().await {
            Ok(pubkey) => {
                self.state.write().wallet = Some(pubkey);
                info!(wallet = %pubkey, "Wallet connected");
                let _ = self.event_tx.send(AppEvent::WalletConnected(pubkey.to_string())).await;
                self.refresh_fee();
                Ok(pubkey)
            }
            Err(e) => {
                warn!(error = %e, "Wallet connection failed");
                self.toast(ToastLevel::Error, e.user_message()).await;
                Err(e)
            }
        }
    }

    pub async fn disconnect_wallet(&self) -> Result<()> {
        self.wallet.disconnect().await?;
        {
            let mut state = self.state.write();
            state.wallet = None;
            state.estimated_fee = None;
        }
        self.abort_fee_task();
        Ok(())
    }

    // endregion: --- Inputs

    // region: --- Fee estimation

    /// Re-estimate the fee for the current inputs in the background.
    ///
    /// Any estimate still in flight is aborted first so a stale result can never
    /// overwrite a newer one.
    fn refresh_fee(&self) {
        self.abort_fee_task();

        let (amount, tier, memo, connected) = {
            let state = self.state.read();
            (state.amount.clone(), state.tier, state.memo.clone(), state.wallet.is_some())
        };

        if !connected || amount.is_empty() {
            self.state.write().estimated_fee = None;
            return;
        }

        let estimator = Arc::clone(&self.estimator);
        let state = Arc::clone(&self.state);
        let event_tx = self.event_tx.clone();

        let handle = tokio::spawn(async move {
            let fee = estimator.estimate_or_clear(&amount, tier, &memo).await;
            state.write().estimated_fee = fee;
            let _ = event_tx.send(AppEvent::FeeEstimated(fee)).await;
        });
        *self.fee_task.lock() = Some(handle);
    }

    fn abort_fee_task(&self) {
        if let Some(handle) = self.fee_task.lock().take() {
            handle.abort();
        }
    }

    // endregion: --- Fee estimation

    // region: --- Donation

    /// Donate with the current inputs.
    ///
    /// Returns `None` without doing anything if a donation is already in flight.
    /// Errors are also surfaced as toasts, so callers may ignore the result.
    #[instrument(skip(self))]
    pub async fn donate(&self) -> Option<Result<Signature>> {
        let (amount, tier, memo) = {
            let mut state = self.state.write();
            if state.is_loading {
                debug!("Donation already in flight - ignoring");
                return None;
            }
            state.is_loading = true;
            (state.amount.clone(), state.tier, state.memo.clone())
        }; // Lock released here
        let loading = LoadingGuard {
            state: Arc::clone(&self.state),
            event_tx: self.event_tx.clone(),
        };

        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let forward = forward_phases(progress_rx, Arc::clone(&self.state), self.event_tx.clone());
        let donation = self
            .orchestrator
            .donate_with_progress(&amount, tier, &memo, Some(progress_tx));
        let (result, ()) = tokio::join!(donation, forward);
        drop(loading);

        {
            let mut state = self.state.write();
            if let Ok(signature) = &result {
                state.reset_inputs();
                state.last_signature = Some(signature.to_string());
            }
        }

        match &result {
            Ok(signature) => {
                info!(%signature, "Donation sent");
                self.toast(ToastLevel::Success, "Donation sent successfully!").await;
                tokio::spawn(refresh_history(
                    Arc::clone(&self.feed),
                    self.settings.history_limit,
                    Arc::clone(&self.state),
                    self.event_tx.clone(),
                ));
            }
            Err(e) => {
                self.toast(ToastLevel::Error, e.user_message()).await;
            }
        }

        Some(result)
    }

    // endregion: --- Donation

    // region: --- Polling

    /// Start the stats and history loops, replacing any running ones.
    pub fn start_polling(&self) {
        let stats = {
            let feed = Arc::clone(&self.feed);
            let state = Arc::clone(&self.state);
            let event_tx = self.event_tx.clone();
            PollingTask::spawn("network-stats", self.settings.stats_interval, move || {
                refresh_stats(Arc::clone(&feed), Arc::clone(&state), event_tx.clone())
            })
        };

        let history = {
            let feed = Arc::clone(&self.feed);
            let state = Arc::clone(&self.state);
            let event_tx = self.event_tx.clone();
            let limit = self.settings.history_limit;
            PollingTask::spawn("donation-history", self.settings.history_interval, move || {
                refresh_history(Arc::clone(&feed), limit, Arc::clone(&state), event_tx.clone())
            })
        };

        // Old tasks are aborted as they drop
        *self.polling.lock() = vec![stats, history];
    }

    pub fn stop_polling(&self) {
        self.polling.lock().clear();
    }

    pub fn is_polling(&self) -> bool {
        self.polling.lock().iter().any(PollingTask::is_running)
    }

    // endregion: --- Polling

    async fn toast(&self, level: ToastLevel, message: impl Into<String>) {
        let _ = self.event_tx.send(AppEvent::toast(level, message)).await;
    }
}

impl Drop for DonationWidget {
    fn drop(&mut self) {
        self.abort_fee_task();
    }
}

/// Clears `is_loading` when a donation ends, including when the `donate` future
/// is dropped mid-flight. A phase left in flight falls back to `Idle`.
struct LoadingGuard {
    state: Arc<RwLock<DonationState>>,
    event_tx: Sender<AppEvent>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let abandoned = {
            let mut state = self.state.write();
            state.is_loading = false;
            if state.phase.is_in_flight() {
                state.phase = DonationPhase::Idle;
                true
            } else {
                false
            }
        }; // Lock released here

        if abandoned {
            warn!("Donation cancelled before completion");
            let _ = self.event_tx.try_send(AppEvent::DonationPhaseChanged(DonationPhase::Idle));
        }
    }
}

/// Mirror every orchestrator phase into the widget state and the event channel.
/// Ends when the orchestrator drops its progress sender.
async fn forward_phases(
    mut phases: mpsc::UnboundedReceiver<DonationPhase>,
    state: Arc<RwLock<DonationState>>,
    event_tx: Sender<AppEvent>,
) {
    while let Some(phase) = phases.recv().await {
        state.write().phase = phase.clone();

        if let DonationPhase::AwaitingConfirmation { .. } = &phase {
            let _ = event_tx
                .send(AppEvent::toast(ToastLevel::Loading, "Confirming transaction..."))
                .await;
        }
        let _ = event_tx.send(AppEvent::DonationPhaseChanged(phase)).await;
    }
}
