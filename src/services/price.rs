use serde_json::Value;
use url::Url;

use crate::{
    config::Config,
    constants::PRICE_QUOTE_CURRENCY,
    error::{AppError, Result},
};

#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// USD price for a price-index asset id. `Ok(None)` when the index has no quote.
    async fn usd_price(&self, asset_id: &str) -> Result<Option<f64>>;
}

/// CoinGecko-compatible `simple/price` client.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(client: reqwest::Client, api_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.coingecko_api_url.clone(),
            config.coingecko_api_key.clone(),
        )
    }

    fn price_url(&self, asset_id: &str) -> Result<Url> {
        let base = format!("{}/simple/price", self.api_url.trim_end_matches('/'));
        Url::parse_with_params(
            &base,
            &[("ids", asset_id), ("vs_currencies", PRICE_QUOTE_CURRENCY)],
        )
        .map_err(|e| AppError::Internal(format!("Invalid price index URL: {}", e)))
    }
}

#[async_trait::async_trait]
impl PriceSource for CoinGeckoClient {
    async fn usd_price(&self, asset_id: &str) -> Result<Option<f64>> {
        let mut request = self.client.get(self.price_url(asset_id)?);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let payload: Value = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to fetch price: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Upstream(format!("Price endpoint returned error status: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid price payload: {}", e)))?;

        Ok(payload
            .get(asset_id)
            .and_then(|quote| quote.get(PRICE_QUOTE_CURRENCY))
            .and_then(Value::as_f64))
    }
}
