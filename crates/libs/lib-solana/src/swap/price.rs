//! # Swap Price API
//!
//! Indicative prices: no taker address needed, nothing to sign.

use super::client::SwapHttpClient;
use super::types::{PriceResponse, SwapParams};
use lib_core::Result;
use tracing::debug;

impl SwapHttpClient {
    /// Fetch an indicative price from `/price`.
    pub async fn get_price(&self, params: &SwapParams) -> Result<PriceResponse> {
        let price: PriceResponse = self.get_json("price", params, "price").await?;
        debug!(
            "Swap price: {} -> {} (rate {})",
            price.sell_amount, price.buy_amount, price.price
        );
        Ok(price)
    }
}
