//! # Swap API Types
//!
//! Request parameters and response bodies of the 0x-style swap API. Amounts and
//! rates travel as decimal strings to keep full precision.

use lib_core::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Query parameters shared by `/price` and `/quote`.
///
/// Exactly one of `sell_amount` / `buy_amount` is normally set. Empty values are
/// left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapParams {
    pub sell_token: String,
    pub buy_token: String,
    /// Sell amount in base units of the sell token
    pub sell_amount: Option<String>,
    /// Buy amount in base units of the buy token
    pub buy_amount: Option<String>,
    /// Slippage as a fraction (`"0.005"` = 0.5%)
    pub slippage_percentage: Option<String>,
    pub taker_address: Option<String>,
}

impl SwapParams {
    /// Sell an exact amount of `sell_token`.
    pub fn sell(sell_token: impl Into<String>, buy_token: impl Into<String>, sell_amount: u128) -> Self {
        Self {
            sell_token: sell_token.into(),
            buy_token: buy_token.into(),
            sell_amount: Some(sell_amount.to_string()),
            ..Default::default()
        }
    }

    /// Buy an exact amount of `buy_token`.
    pub fn buy(sell_token: impl Into<String>, buy_token: impl Into<String>, buy_amount: u128) -> Self {
        Self {
            sell_token: sell_token.into(),
            buy_token: buy_token.into(),
            buy_amount: Some(buy_amount.to_string()),
            ..Default::default()
        }
    }

    pub fn with_slippage(mut self, settings: &SwapSettings) -> Self {
        self.slippage_percentage = Some(settings.slippage_fraction());
        self
    }

    pub fn with_taker(mut self, taker: impl Into<String>) -> Self {
        self.taker_address = Some(taker.into());
        self
    }

    /// Non-empty parameters as `(name, value)` pairs in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let fields: [(&'static str, Option<&str>); 6] = [
            ("sellToken", Some(self.sell_token.as_str())),
            ("buyToken", Some(self.buy_token.as_str())),
            ("sellAmount", self.sell_amount.as_deref()),
            ("buyAmount", self.buy_amount.as_deref()),
            ("slippagePercentage", self.slippage_percentage.as_deref()),
            ("takerAddress", self.taker_address.as_deref()),
        ];

        fields
            .into_iter()
            .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
            .collect()
    }
}

/// Indicative price from `/price`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceResponse {
    pub price: String,
    pub estimated_gas: String,
    pub estimated_price_impact: Option<String>,
    pub value: String,
    pub gas_price: String,
    pub sell_token_to_eth_rate: String,
    pub buy_token_to_eth_rate: String,
    pub sell_amount: String,
    pub buy_amount: String,
    pub allowance_target: String,
    pub sources: Vec<serde_json::Value>,
}

/// Firm quote from `/quote`: the price fields plus the transaction to submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub price: PriceResponse,
    /// Calldata
    #[serde(default)]
    pub data: String,
    /// Contract to send the transaction to
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub gas: String,
}

/// Slippage presets offered by the settings panel, in percent.
pub const SLIPPAGE_PRESETS: [f64; 3] = [0.1, 0.5, 1.0];

pub const DEFAULT_SLIPPAGE_PERCENT: f64 = 0.5;
pub const DEFAULT_DEADLINE_MINUTES: u32 = 20;
const MAX_SLIPPAGE_PERCENT: f64 = 50.0;
const MAX_DEADLINE_MINUTES: u32 = 4320;

/// User-adjustable swap settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapSettings {
    slippage_percent: f64,
    deadline_minutes: u32,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            slippage_percent: DEFAULT_SLIPPAGE_PERCENT,
            deadline_minutes: DEFAULT_DEADLINE_MINUTES,
        }
    }
}

impl SwapSettings {
    pub fn slippage_percent(&self) -> f64 {
        self.slippage_percent
    }

    pub fn deadline_minutes(&self) -> u32 {
        self.deadline_minutes
    }

    /// Set slippage in percent; must be in `(0, 50]`.
    pub fn set_slippage(&mut self, percent: f64) -> Result<()> {
        if !(percent > 0.0 && percent <= MAX_SLIPPAGE_PERCENT) {
            return Err(AppError::Validation(format!(
                "Slippage must be greater than 0 and at most {}%",
                MAX_SLIPPAGE_PERCENT
            )));
        }
        self.slippage_percent = percent;
        Ok(())
    }

    /// Set the transaction deadline; must be in `1..=4320` minutes.
    pub fn set_deadline(&mut self, minutes: u32) -> Result<()> {
        if !(1..=MAX_DEADLINE_MINUTES).contains(&minutes) {
            return Err(AppError::Validation(format!(
                "Deadline must be between 1 and {} minutes",
                MAX_DEADLINE_MINUTES
            )));
        }
        self.deadline_minutes = minutes;
        Ok(())
    }

    /// Slippage as the fraction string the API expects.
    pub fn slippage_fraction(&self) -> String {
        (self.slippage_percent / 100.0).to_string()
    }
}
