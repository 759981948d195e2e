//! # Widget State
//!
//! Plain state structs shared between a widget and its background tasks through
//! `Arc<parking_lot::RwLock<_>>`. Locks are never held across an `.await`.

use lib_solana::swap::{tokens_for_chain, PriceResponse, SwapParams, SwapSettings, Token, BASE_CHAIN_ID};
use lib_solana::units::TokenAmount;
use lib_solana::{DonationPhase, DonationSummary, NetworkStats, PriorityTier, TransactionHistoryEntry};
use solana_sdk::pubkey::Pubkey;

/// State behind the donation form
#[derive(Debug, Clone, Default)]
pub struct DonationState {
    /// Amount as typed, in SOL
    pub amount: String,
    pub memo: String,
    pub tier: PriorityTier,
    /// Connected wallet, if any
    pub wallet: Option<Pubkey>,
    /// True while a donation is being orchestrated
    pub is_loading: bool,
    /// Fee estimate for the current inputs, in lamports
    pub estimated_fee: Option<u64>,
    pub phase: DonationPhase,
    pub last_signature: Option<String>,
    pub network_stats: Option<NetworkStats>,
    pub history: Vec<TransactionHistoryEntry>,
    pub summary: DonationSummary,
}

impl DonationState {
    /// Clear the form after a confirmed donation.
    pub fn reset_inputs(&mut self) {
        self.amount.clear();
        self.memo.clear();
        self.estimated_fee = None;
    }

    /// USD value of the typed amount at the last known SOL price.
    pub fn amount_usd(&self) -> Option<f64> {
        let sol: f64 = self.amount.parse().ok()?;
        self.network_stats.map(|stats| sol * stats.sol_price)
    }
}

/// State behind the swap form
#[derive(Debug, Clone)]
pub struct SwapState {
    pub from_token: Token,
    pub to_token: Token,
    /// Sell amount as typed, in whole tokens
    pub from_amount: String,
    /// Derived buy amount from the last quote, in whole tokens
    pub to_amount: String,
    pub settings: SwapSettings,
    pub quote_loading: bool,
    /// Last quote error, shown under the form
    pub error: Option<String>,
    pub last_price: Option<PriceResponse>,
    /// Address that will execute the swap, used for firm quotes
    pub taker: Option<String>,
    /// Bumped on every input change; results tagged with an older value are dropped
    pub quote_generation: u64,
}

impl Default for SwapState {
    fn default() -> Self {
        let tokens = tokens_for_chain(BASE_CHAIN_ID);
        Self {
            from_token: tokens[0],
            to_token: tokens[1],
            from_amount: String::new(),
            to_amount: String::new(),
            settings: SwapSettings::default(),
            quote_loading: false,
            error: None,
            last_price: None,
            taker: None,
            quote_generation: 0,
        }
    }
}

impl SwapState {
    /// Query parameters for the current inputs, `None` when there is nothing to quote.
    pub fn quote_params(&self) -> Option<SwapParams> {
        let amount = TokenAmount::parse(&self.from_amount, self.from_token.decimals).ok()?;
        if amount.is_zero() || self.from_token.address == self.to_token.address {
            return None;
        }

        let params = SwapParams::sell(self.from_token.address, self.to_token.address, amount.base_units())
            .with_slippage(&self.settings);
        Some(match &self.taker {
            Some(taker) => params.with_taker(taker.clone()),
            None => params,
        })
    }

    /// Clear everything derived from a quote.
    pub fn clear_quote(&mut self) {
        self.to_amount.clear();
        self.last_price = None;
        self.quote_loading = false;
    }
}
