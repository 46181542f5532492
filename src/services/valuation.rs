use ethers::types::{U256, U512};
use futures_util::future::join_all;

use crate::{
    constants::{NATIVE_PRICE_FALLBACK, PRICE_SCALE_DECIMALS},
    models::TokenBalanceEntry,
};

use super::price::PriceSource;

// 10^154 is the largest power of ten that fits in 512 bits.
const MAX_DIVISOR_DECIMALS: u32 = 154;

/// Quantizes a fiat price into an 18-decimal fixed-point integer: `floor(price * 1e18)`.
///
/// Returns `None` for prices that are not finite, not positive, round down to
/// zero or do not fit in 128 bits.
pub fn quantize_price(price: f64) -> Option<U256> {
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    let scaled = (price * 10f64.powi(PRICE_SCALE_DECIMALS as i32)).floor();
    if scaled < 1.0 || scaled >= u128::MAX as f64 {
        return None;
    }
    Some(U256::from(scaled as u128))
}

/// `floor(balance * scaled_price / 10^decimals)`, computed in 512 bits.
///
/// The product of two `U256` values always fits, and any divisor past 10^154
/// is larger than that product, so the result is exact for every input.
pub fn token_value(balance: U256, scaled_price: U256, decimals: u32) -> U512 {
    if decimals > MAX_DIVISOR_DECIMALS {
        return U512::zero();
    }
    let product = U512::from(balance) * U512::from(scaled_price);
    product / U512::exp10(decimals as usize)
}

/// Price lookup that never fails: errors, missing quotes and non-positive
/// prices all come back as `None`.
pub async fn best_effort_price(prices: &dyn PriceSource, asset_id: &str) -> Option<f64> {
    match prices.usd_price(asset_id).await {
        Ok(Some(price)) if price.is_finite() && price > 0.0 => Some(price),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!("Price lookup for {} failed: {}", asset_id, err);
            None
        }
    }
}

/// Total wallet value in the native balance's unit.
///
/// The running total starts at the raw native balance. Each priced token adds
/// `floor(balance * floor(price * 1e18) / 10^decimals)`; tokens without a
/// usable price are left out. A sum past `U256::MAX` saturates.
pub async fn calculate_total_value(
    prices: &dyn PriceSource,
    native_asset_id: &str,
    native_balance: U256,
    tokens: &[TokenBalanceEntry],
) -> U256 {
    match best_effort_price(prices, native_asset_id).await {
        Some(price) => tracing::debug!("{} price: {}", native_asset_id, price),
        None => tracing::warn!(
            "Could not get {} price, defaulting to {}",
            native_asset_id,
            NATIVE_PRICE_FALLBACK
        ),
    }

    let token_prices = join_all(tokens.iter().map(|token| async move {
        let asset_id = token.symbol.trim().to_lowercase();
        if asset_id.is_empty() {
            return None;
        }
        best_effort_price(prices, &asset_id).await
    }))
    .await;

    let mut total = U512::from(native_balance);
    for (token, price) in tokens.iter().zip(token_prices) {
        let Some(scaled) = price.and_then(quantize_price) else {
            tracing::debug!("Could not get price for token {}", token.symbol);
            continue;
        };
        total = total.saturating_add(token_value(token.balance, scaled, token.decimals));
    }

    U256::try_from(total).unwrap_or_else(|_| {
        tracing::warn!("Total value exceeds 256 bits, saturating");
        U256::MAX
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use std::collections::HashMap;

    /// Fixed price table; assets listed in `failing` return an error.
    pub(crate) struct StaticPrices {
        pub quotes: HashMap<String, f64>,
        pub failing: Vec<String>,
    }

    impl StaticPrices {
        pub(crate) fn new(quotes: &[(&str, f64)]) -> Self {
            Self {
                quotes: quotes.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                failing: Vec::new(),
            }
        }
    }

    #[async_trait::async_trait]
    impl PriceSource for StaticPrices {
        async fn usd_price(&self, asset_id: &str) -> Result<Option<f64>> {
            if self.failing.iter().any(|id| id == asset_id) {
                return Err(AppError::Upstream(format!("no route to {}", asset_id)));
            }
            Ok(self.quotes.get(asset_id).copied())
        }
    }

    fn token(symbol: &str, decimals: u32, balance: U256) -> TokenBalanceEntry {
        TokenBalanceEntry {
            token_address: format!("0x{}", symbol.to_lowercase()),
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            decimals,
            balance,
        }
    }

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn quantize_floors_and_rejects_unusable() {
        assert_eq!(quantize_price(1.5), Some(U256::from(1_500_000_000_000_000_000u128)));
        assert_eq!(quantize_price(0.0), None);
        assert_eq!(quantize_price(-2.0), None);
        assert_eq!(quantize_price(f64::NAN), None);
        assert_eq!(quantize_price(1e-19), None);
    }

    #[test]
    fn token_value_is_exact_for_eighteen_decimals() {
        // Memastikan 2 token x 1.5 USD = 3e18 tanpa pembulatan float
        let scaled = quantize_price(1.5).unwrap();
        assert_eq!(token_value(eth(2), scaled, 18), U512::from(eth(3)));
    }

    #[test]
    fn token_value_floors_division() {
        let scaled = quantize_price(1.0).unwrap();
        // 7 base units of a 6-decimal token at 1 USD -> 7e12 on the 1e18 scale
        assert_eq!(
            token_value(U256::from(7u64), scaled, 6),
            U512::from(7_000_000_000_000u64)
        );
        assert_eq!(token_value(U256::one(), U256::one(), 2), U512::zero());
    }

    #[test]
    fn token_value_handles_extreme_inputs() {
        let product = U512::from(U256::MAX) * U512::from(2u64);
        assert_eq!(token_value(U256::MAX, U256::from(2u64), 0), product);
        assert_eq!(token_value(U256::one(), U256::one(), 200), U512::zero());
        assert_eq!(token_value(U256::MAX, U256::MAX, 155), U512::zero());
    }

    #[tokio::test]
    async fn native_balance_is_not_converted() {
        // Memastikan total dimulai dari saldo native mentah walau harga ETH tersedia
        let prices = StaticPrices::new(&[("ethereum", 2000.0)]);
        let total = calculate_total_value(&prices, "ethereum", eth(3), &[]).await;
        assert_eq!(total, eth(3));
    }

    #[tokio::test]
    async fn native_price_failure_keeps_raw_balance() {
        let mut prices = StaticPrices::new(&[]);
        prices.failing.push("ethereum".to_string());
        let balance = U256::from_dec_str("123456789012345678901").unwrap();
        let total = calculate_total_value(&prices, "ethereum", balance, &[]).await;
        assert_eq!(total, balance);
    }

    #[tokio::test]
    async fn priced_token_adds_to_native_balance() {
        let prices = StaticPrices::new(&[("ethereum", 2000.0), ("foo", 2.0)]);
        let tokens = vec![token("FOO", 0, U256::from(5u64))];
        let total = calculate_total_value(&prices, "ethereum", eth(1), &tokens).await;
        assert_eq!(total, eth(11));
    }

    #[tokio::test]
    async fn tokens_without_price_are_skipped() {
        let mut prices = StaticPrices::new(&[("foo", 2.0), ("zero", 0.0)]);
        prices.failing.push("bar".to_string());
        let tokens = vec![
            token("FOO", 0, U256::from(5u64)),
            token("BAR", 18, eth(100)),
            token("ZERO", 18, eth(100)),
            token("NOPE", 18, eth(100)),
        ];

        let total = calculate_total_value(&prices, "ethereum", eth(1), &tokens).await;
        assert_eq!(total, eth(11));
    }

    #[tokio::test]
    async fn huge_balance_token_does_not_drop_other_tokens() {
        // Memastikan token spam dengan saldo raksasa tidak menghapus nilai token lain
        let prices = StaticPrices::new(&[("ethereum", 2000.0), ("foo", 2.0), ("spam", 1.0)]);
        let spam_balance = U256::MAX / 2;
        let tokens = vec![
            token("FOO", 0, U256::from(5u64)),
            token("SPAM", 18, spam_balance),
        ];

        let total = calculate_total_value(&prices, "ethereum", eth(1), &tokens).await;
        assert_eq!(total, eth(11) + spam_balance);
    }

    #[tokio::test]
    async fn oversized_decimals_contribute_nothing() {
        let prices = StaticPrices::new(&[("ethereum", 2000.0), ("foo", 2.0), ("odd", 1.0)]);
        let tokens = vec![
            token("FOO", 0, U256::from(5u64)),
            token("ODD", 80, U256::one()),
        ];

        let total = calculate_total_value(&prices, "ethereum", eth(1), &tokens).await;
        assert_eq!(total, eth(11));
    }

    #[tokio::test]
    async fn total_past_256_bits_saturates() {
        let prices = StaticPrices::new(&[("big", 2.0)]);
        let tokens = vec![token("BIG", 0, U256::MAX)];
        let total = calculate_total_value(&prices, "ethereum", eth(1), &tokens).await;
        assert_eq!(total, U256::MAX);
    }
}
