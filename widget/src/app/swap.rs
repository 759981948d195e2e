//! # Swap Widget
//!
//! Token selection, amount entry and indicative pricing for the swap form.
//!
//! Every input change schedules a quote fetch after a quiet period. A newer
//! change aborts the pending fetch, and results are tagged with the input
//! generation they were requested for, so an answer that arrives late is
//! dropped instead of overwriting a newer one.

use crate::app::events::AppEvent;
use crate::app::state::SwapState;
use crate::core::service::QuoteService;
use async_channel::Sender;
use lib_core::{AppError, Config, Result};
use lib_solana::swap::{find_token_by_symbol, PriceResponse, QuoteResponse, Token, BASE_CHAIN_ID};
use lib_solana::units::TokenAmount;
use lib_utils::validation::is_decimal_input;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default quiet period before a quote is requested.
pub const DEFAULT_QUOTE_DEBOUNCE: Duration = Duration::from_millis(500);

pub struct SwapWidget {
    state: Arc<RwLock<SwapState>>,
    quotes: Arc<dyn QuoteService>,
    debounce: Duration,
    event_tx: Sender<AppEvent>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SwapWidget {
    pub fn new(quotes: Arc<dyn QuoteService>, debounce: Duration, event_tx: Sender<AppEvent>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SwapState::default())),
            quotes,
            debounce,
            event_tx,
            pending: Mutex::new(None),
        }
    }

    pub fn from_config(quotes: Arc<dyn QuoteService>, config: &Config, event_tx: Sender<AppEvent>) -> Self {
        Self::new(quotes, config.quote_debounce(), event_tx)
    }

    pub fn state(&self) -> Arc<RwLock<SwapState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> SwapState {
        self.state.read().clone()
    }

    // region: --- Inputs

    /// Update the sell amount. Returns `false` for input that is not a partial
    /// decimal number.
    pub fn set_from_amount(&self, value: &str) -> bool {
        if !is_decimal_input(value) {
            return false;
        }
        self.state.write().from_amount = value.to_string();
        self.schedule_quote();
        true
    }

    pub fn select_from_token(&self, symbol: &str) -> Result<Token> {
        let token = lookup(symbol)?;
        self.state.write().from_token = token;
        self.schedule_quote();
        Ok(token)
    }

    pub fn select_to_token(&self, symbol: &str) -> Result<Token> {
        let token = lookup(symbol)?;
        self.state.write().to_token = token;
        self.schedule_quote();
        Ok(token)
    }

    /// Swap sell and buy tokens, keeping the typed amount.
    pub fn switch_tokens(&self) {
        {
            let mut state = self.state.write();
            let SwapState {
                from_token, to_token, ..
            } = &mut *state;
            std::mem::swap(from_token, to_token);
        }
        self.schedule_quote();
    }

    pub fn set_slippage(&self, percent: f64) -> Result<()> {
        self.state.write().settings.set_slippage(percent)?;
        self.schedule_quote();
        Ok(())
    }

    pub fn set_deadline(&self, minutes: u32) -> Result<()> {
        self.state.write().settings.set_deadline(minutes)
    }

    /// Address that will execute the swap. Required for firm quotes.
    pub fn set_taker(&self, taker: Option<String>) {
        self.state.write().taker = taker.filter(|t| !t.is_empty());
    }

    // endregion: --- Inputs

    // region: --- Quotes

    /// Debounced indicative price for the current inputs.
    ///
    /// Aborts the pending fetch, if any. With nothing to quote the derived
    /// amount and error are cleared right away.
    fn schedule_quote(&self) {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let (generation, params, to_decimals) = {
            let mut state = self.state.write();
            state.quote_generation += 1;
            state.error = None;
            match state.quote_params() {
                Some(params) => {
                    state.quote_loading = true;
                    (state.quote_generation, params, state.to_token.decimals)
                }
                None => {
                    state.clear_quote();
                    return;
                }
            }
        }; // Lock released here

        let quotes = Arc::clone(&self.quotes);
        let state = Arc::clone(&self.state);
        let event_tx = self.event_tx.clone();
        let debounce = self.debounce;

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            debug!(generation, sell_amount = ?params.sell_amount, "Fetching swap price");

            let result = quotes.get_price(&params).await;
            if !apply_price(&state, generation, to_decimals, &result) {
                debug!(generation, "Discarding stale swap price");
                return;
            }

            let event = AppEvent::QuoteUpdated(result.map_err(|e| e.user_message()));
            let _ = event_tx.send(event).await;
        }));
    }

    /// Firm quote for the current inputs, for the host to hand to a wallet.
    pub async fn fetch_firm_quote(&self) -> Result<QuoteResponse> {
        let params = {
            let state = self.state.read();
            let taker = state
                .taker
                .clone()
                .ok_or_else(|| AppError::Validation("Please connect your wallet first".to_string()))?;
            state
                .quote_params()
                .ok_or_else(|| AppError::Validation("Please enter an amount".to_string()))?
                .with_taker(taker)
        };

        self.quotes.get_quote(&params).await.inspect_err(|e| {
            warn!(error = %e, "Firm quote failed");
        })
    }

    // endregion: --- Quotes
}

impl Drop for SwapWidget {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

fn lookup(symbol: &str) -> Result<Token> {
    find_token_by_symbol(symbol, BASE_CHAIN_ID)
        .copied()
        .ok_or_else(|| AppError::Validation(format!("Unknown token: {}", symbol)))
}

/// Store a price result if it still belongs to the current inputs.
///
/// Returns `false` when the inputs changed since the request was made.
fn apply_price(
    state: &RwLock<SwapState>,
    generation: u64,
    to_decimals: u8,
    result: &Result<PriceResponse>,
) -> bool {
    let mut state = state.write();
    if state.quote_generation != generation {
        return false;
    }

    state.quote_loading = false;
    match result {
        Ok(price) => match price.buy_amount.parse::<u128>() {
            Ok(base_units) => {
                state.to_amount = TokenAmount::from_base_units(base_units, to_decimals).to_string();
                state.last_price = Some(price.clone());
                state.error = None;
            }
            Err(_) => {
                state.clear_quote();
                state.error = Some("Invalid quote received".to_string());
            }
        },
        Err(e) => {
            warn!(error = %e, "Swap price failed");
            state.clear_quote();
            state.error = Some(e.user_message());
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::mock::MockQuotes;
    use async_channel::Receiver;

    fn widget(quotes: Arc<MockQuotes>) -> (SwapWidget, Receiver<AppEvent>) {
        let (tx, rx) = async_channel::unbounded();
        (SwapWidget::new(quotes, DEFAULT_QUOTE_DEBOUNCE, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_sends_only_last_input() {
        let quotes = Arc::new(MockQuotes::with_rate(2));
        let (widget, rx) = widget(quotes.clone());
        widget.select_from_token("USDC").unwrap();
        widget.select_to_token("DAI").unwrap();

        widget.set_from_amount("1");
        tokio::time::sleep(Duration::from_millis(200)).await;
        widget.set_from_amount("12");
        tokio::time::sleep(Duration::from_millis(200)).await;
        widget.set_from_amount("12.5");
        assert!(widget.snapshot().quote_loading);

        tokio::time::sleep(Duration::from_millis(600)).await;

        let calls = quotes.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].sell_amount.as_deref(), Some("12500000"));

        let state = widget.snapshot();
        assert!(!state.quote_loading);
        // 25_000_000 base units of an 18-decimal token
        assert_eq!(state.to_amount, "0.000000000025");
        assert!(matches!(rx.try_recv(), Ok(AppEvent::QuoteUpdated(Ok(_)))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_sets_error_and_clears_to_amount() {
        let quotes = Arc::new(MockQuotes::failing("Failed to fetch price: 400 bad pair"));
        let (widget, rx) = widget(quotes);
        widget.state.write().to_amount = "3".into();

        widget.set_from_amount("1");
        tokio::time::sleep(Duration::from_secs(1)).await;

        let state = widget.snapshot();
        assert_eq!(state.error.as_deref(), Some("Failed to fetch price: 400 bad pair"));
        assert!(state.to_amount.is_empty());
        assert!(!state.quote_loading);
        assert!(matches!(rx.try_recv(), Ok(AppEvent::QuoteUpdated(Err(_)))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_amount_cancels_pending_fetch() {
        let quotes = Arc::new(MockQuotes::with_rate(1));
        let (widget, _rx) = widget(quotes.clone());

        widget.set_from_amount("1");
        widget.set_from_amount("");
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(quotes.calls().is_empty());
        let state = widget.snapshot();
        assert!(state.to_amount.is_empty());
        assert!(!state.quote_loading);
    }

    #[tokio::test]
    async fn test_stale_result_is_dropped() {
        let quotes = Arc::new(MockQuotes::with_rate(1));
        let (widget, _rx) = widget(quotes);
        widget.state.write().quote_generation = 7;

        let price = PriceResponse {
            buy_amount: "1000000".into(),
            ..Default::default()
        };
        assert!(!apply_price(&widget.state, 6, 6, &Ok(price.clone())));
        assert!(widget.snapshot().to_amount.is_empty());

        assert!(apply_price(&widget.state, 7, 6, &Ok(price)));
        assert_eq!(widget.snapshot().to_amount, "1");
    }

    #[tokio::test]
    async fn test_input_validation() {
        let (widget, _rx) = widget(Arc::new(MockQuotes::with_rate(1)));

        assert!(!widget.set_from_amount("1e5"));
        assert!(widget.select_from_token("DOGE").is_err());
        assert!(widget.set_slippage(0.0).is_err());
        assert!(widget.set_deadline(0).is_err());
        widget.set_deadline(30).unwrap();
        assert_eq!(widget.snapshot().settings.deadline_minutes(), 30);
    }

    #[tokio::test]
    async fn test_switch_tokens() {
        let (widget, _rx) = widget(Arc::new(MockQuotes::with_rate(1)));
        let before = widget.snapshot();

        widget.switch_tokens();

        let after = widget.snapshot();
        assert_eq!(after.from_token, before.to_token);
        assert_eq!(after.to_token, before.from_token);
    }

    #[tokio::test]
    async fn test_firm_quote_requires_taker() {
        let quotes = Arc::new(MockQuotes::with_rate(3));
        let (widget, _rx) = widget(quotes.clone());
        widget.state.write().from_amount = "1".into();

        let err = widget.fetch_firm_quote().await.unwrap_err();
        assert_eq!(err.code(), "Validation");

        widget.set_taker(Some("0xTaker".into()));
        let quote = widget.fetch_firm_quote().await.unwrap();
        assert_eq!(quote.to, "0xdef1");
        assert_eq!(quotes.quote_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
