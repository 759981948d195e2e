//! # Swap Quote API
//!
//! Firm quotes: the response carries the transaction to submit.

use super::client::SwapHttpClient;
use super::types::{QuoteResponse, SwapParams};
use lib_core::Result;
use tracing::debug;

impl SwapHttpClient {
    /// Fetch a firm quote from `/quote`.
    pub async fn get_quote(&self, params: &SwapParams) -> Result<QuoteResponse> {
        let quote: QuoteResponse = self.get_json("quote", params, "quote").await?;
        debug!(
            "Swap quote: {} -> {} via {} (gas {})",
            quote.price.sell_amount, quote.price.buy_amount, quote.to, quote.gas
        );
        Ok(quote)
    }
}
