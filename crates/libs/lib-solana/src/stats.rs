//! Network conditions shown above the donation form.

use crate::cache::PriceCache;
use crate::client::SolanaClient;
use crate::types::NetworkStats;
use lib_core::Result;
use tracing::debug;

/// Fetch slot, block time and SOL price.
///
/// Slot and performance samples are requested concurrently; the price goes
/// through the cache.
pub async fn fetch_network_stats(client: &SolanaClient, prices: &PriceCache) -> Result<NetworkStats> {
    let (current_slot, samples) = tokio::try_join!(client.get_slot(), client.get_recent_performance_samples(1))?;
    let sol_price = prices.get_price("SOL").await?.price;

    let stats = NetworkStats {
        current_slot,
        average_block_time: average_block_time(samples.first().map(|s| s.sample_period_secs)),
        sol_price,
    };
    debug!(?stats, "Network stats refreshed");
    Ok(stats)
}

/// Sample period of the newest performance sample, 0 when the node returned none.
pub fn average_block_time(sample_period_secs: Option<u16>) -> f64 {
    sample_period_secs.map(f64::from).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_block_time() {
        assert_eq!(average_block_time(Some(60)), 60.0);
        assert_eq!(average_block_time(None), 0.0);
    }
}
