//! # Price Caching Module
//!
//! Short-lived cache in front of the spot price feed. Polling loops and the swap
//! widget's USD estimates share it, so the price API sees at most one request per
//! symbol per TTL window.
//!
//! ## Example
//! ```no_run
//! # async fn example() -> lib_core::Result<()> {
//! use lib_solana::{cache::PriceCache, price_feed::PriceFeedClient};
//! use std::sync::Arc;
//!
//! let feed = Arc::new(PriceFeedClient::new("https://api.coingecko.com/api/v3")?);
//! let cache = PriceCache::new(feed);
//! let price = cache.get_price("SOL").await?;
//! println!("SOL price: ${}", price.price);
//! # Ok(())
//! # }
//! ```

use crate::price_feed::PriceFeedClient;
use crate::types::PriceData;
use lib_core::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Default time a cached price stays valid.
pub const DEFAULT_PRICE_TTL: Duration = Duration::from_secs(10);

/// Represents a cached price entry with metadata and expiration.
struct CachedPrice {
    data: PriceData,
    /// When this price was cached
    fetched_at: Instant,
}

/// Thread-safe price cache with automatic expiration.
///
/// The cache uses a read-write lock to allow concurrent reads while serializing writes.
/// Expired entries are refreshed on next access.
pub struct PriceCache {
    cache: Arc<RwLock<HashMap<String, CachedPrice>>>,
    feed: Arc<PriceFeedClient>,
    ttl: Duration,
}

/// Current Unix timestamp, or 0 if the system clock is before the epoch.
fn get_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_else(|e| {
            warn!("System time is before Unix epoch: {}. Using 0.", e);
            0
        })
}

impl PriceCache {
    pub fn new(feed: Arc<PriceFeedClient>) -> Self {
        Self::with_ttl(feed, DEFAULT_PRICE_TTL)
    }

    pub fn with_ttl(feed: Arc<PriceFeedClient>, ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            feed,
            ttl,
        }
    }

    /// Get the current price for a token symbol, using cache if available.
    ///
    /// Symbols are case-insensitive. Failed fetches are not cached.
    pub async fn get_price(&self, symbol: &str) -> Result<PriceData> {
        let key = symbol.to_uppercase();

        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(&key) {
                if cached.fetched_at.elapsed() < self.ttl {
                    debug!("Cache hit for {}: ${:.4}", key, cached.data.price);
                    return Ok(cached.data.clone());
                }
                debug!("Cache expired for {}", key);
            }
        }

        let price = self.feed.get_price(&key).await?;
        let data = PriceData {
            price,
            source: "coingecko".into(),
            last_updated: get_unix_timestamp(),
        };

        self.cache.write().await.insert(
            key,
            CachedPrice {
                data: data.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(data)
    }

    /// Get multiple prices, returning only successful fetches.
    pub async fn get_prices(&self, symbols: &[&str]) -> HashMap<String, PriceData> {
        let mut prices = HashMap::new();

        for symbol in symbols {
            match self.get_price(symbol).await {
                Ok(price_data) => {
                    prices.insert(symbol.to_string(), price_data);
                }
                Err(e) => {
                    warn!("Failed to get price for {}: {}", symbol, e);
                }
            }
        }

        prices
    }

    /// Drop every cached entry.
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    async fn server_with_price(hits: usize) -> (mockito::ServerGuard, mockito::Mock) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/simple/price")
            .match_query(Matcher::UrlEncoded("ids".into(), "solana".into()))
            .with_status(200)
            .with_body(r#"{"solana":{"usd":150.0}}"#)
            .expect(hits)
            .create_async()
            .await;
        (server, mock)
    }

    #[tokio::test]
    async fn test_second_read_is_cached() {
        let (server, mock) = server_with_price(1).await;
        let cache = PriceCache::new(Arc::new(PriceFeedClient::new(server.url()).unwrap()));

        let first = cache.get_price("SOL").await.unwrap();
        let second = cache.get_price("sol").await.unwrap();

        assert_eq!(first.price, 150.0);
        assert_eq!(second.source, "coingecko");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let (server, mock) = server_with_price(2).await;
        let cache = PriceCache::with_ttl(Arc::new(PriceFeedClient::new(server.url()).unwrap()), Duration::ZERO);

        cache.get_price("SOL").await.unwrap();
        cache.get_price("SOL").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_prices_skips_failures() {
        let (server, _mock) = server_with_price(1).await;
        let cache = PriceCache::new(Arc::new(PriceFeedClient::new(server.url()).unwrap()));

        let prices = cache.get_prices(&["SOL", "NOPE"]).await;
        assert_eq!(prices.len(), 1);
        assert!(prices.contains_key("SOL"));
    }
}
