use tracing::warn;

use crate::{cache::TimedCache, provider::HTTP};

/// USD price lookups with a short-lived cache. The oracle never fails: a
/// missing or failed quote degrades to the configured fallback, which is
/// not cached so the next call tries the feed again.
#[derive(Debug)]
pub struct PriceOracle {
    cache: TimedCache<f64>,
}

impl PriceOracle {
    pub fn new(ttl_seconds: u64) -> PriceOracle {
        PriceOracle {
            cache: TimedCache::new(ttl_seconds),
        }
    }

    pub async fn usd_price(
        &self,
        http: &HTTP,
        coin_id: &str,
        fallback: f64,
    ) -> f64 {
        if let Some(price) = self.cache.get(coin_id).await {
            return price;
        }

        match http.get_coingecko_prices(&[coin_id]).await {
            Ok(prices) => {
                let quote = prices
                    .get(coin_id)
                    .and_then(|quotes| quotes.get("usd"))
                    .copied();
                match quote {
                    Some(price) => {
                        self.cache.set(coin_id, price).await;
                        price
                    }
                    None => {
                        warn!("price feed returned no usd quote for {}", coin_id);
                        fallback
                    }
                }
            }
            Err(err) => {
                warn!("price fetch failed for {}: {}", coin_id, err);
                fallback
            }
        }
    }
}
