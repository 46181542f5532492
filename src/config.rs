use serde::Deserialize;
use std::env;
use std::str::FromStr;
use url::Url;

use crate::constants::{
    COINGECKO_API, DEFAULT_PORT, ETHERSCAN_API, HISTORY_WINDOW_DAYS_DEFAULT,
    NATIVE_PRICE_ASSET_ID,
};

/// Where the native balance is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSource {
    Rpc,
    Explorer,
}

impl FromStr for BalanceSource {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rpc" | "node" => Ok(BalanceSource::Rpc),
            "explorer" | "etherscan" => Ok(BalanceSource::Explorer),
            other => anyhow::bail!("Unknown BALANCE_SOURCE '{}' (expected rpc or explorer)", other),
        }
    }
}

/// How the trailing history window is applied.
///
/// `ServerSide` sends a `starttime` bound and keeps records at or after the
/// cutoff. `ClientSide` pulls the full block range and keeps records strictly
/// after the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    ServerSide,
    ClientSide,
}

impl FromStr for HistoryFilter {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "server" | "server-side" | "starttime" => Ok(HistoryFilter::ServerSide),
            "client" | "client-side" | "timestamp" => Ok(HistoryFilter::ClientSide),
            other => anyhow::bail!("Unknown HISTORY_FILTER '{}' (expected server or client)", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Explorer
    pub etherscan_api_key: String,
    pub etherscan_api_url: String,

    // Price index
    pub coingecko_api_url: String,
    pub coingecko_api_key: Option<String>,
    pub native_price_asset_id: String,

    // Blockchain
    pub ethereum_rpc_url: Option<String>,
    pub balance_source: BalanceSource,

    // History
    pub history_window_days: u32,
    pub history_filter: HistoryFilter,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let ethereum_rpc_url = non_empty_var("RPC_URL").or_else(|| non_empty_var("ETHEREUM_RPC_URL"));
        let balance_source = match non_empty_var("BALANCE_SOURCE") {
            Some(raw) => raw.parse()?,
            None if ethereum_rpc_url.is_some() => BalanceSource::Rpc,
            None => BalanceSource::Explorer,
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match non_empty_var("PORT") {
                Some(raw) => raw.parse()?,
                None => DEFAULT_PORT,
            },
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            etherscan_api_key: env::var("ETHERSCAN_API_KEY")
                .map_err(|_| anyhow::anyhow!("ETHERSCAN_API_KEY is not set"))?,
            etherscan_api_url: env::var("ETHERSCAN_API_URL")
                .unwrap_or_else(|_| ETHERSCAN_API.to_string()),

            coingecko_api_url: env::var("COINGECKO_API_URL")
                .unwrap_or_else(|_| COINGECKO_API.to_string()),
            coingecko_api_key: non_empty_var("COINGECKO_API_KEY"),
            native_price_asset_id: env::var("NATIVE_PRICE_ASSET_ID")
                .unwrap_or_else(|_| NATIVE_PRICE_ASSET_ID.to_string()),

            ethereum_rpc_url,
            balance_source,

            history_window_days: match non_empty_var("HISTORY_WINDOW_DAYS") {
                Some(raw) => raw.parse()?,
                None => HISTORY_WINDOW_DAYS_DEFAULT,
            },
            history_filter: match non_empty_var("HISTORY_FILTER") {
                Some(raw) => raw.parse()?,
                None => HistoryFilter::ServerSide,
            },

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.etherscan_api_key.trim().is_empty() {
            anyhow::bail!("ETHERSCAN_API_KEY is empty");
        }
        Url::parse(&self.etherscan_api_url)
            .map_err(|e| anyhow::anyhow!("Invalid ETHERSCAN_API_URL: {}", e))?;
        Url::parse(&self.coingecko_api_url)
            .map_err(|e| anyhow::anyhow!("Invalid COINGECKO_API_URL: {}", e))?;

        if self.balance_source == BalanceSource::Rpc {
            let Some(rpc_url) = self.ethereum_rpc_url.as_deref() else {
                anyhow::bail!("BALANCE_SOURCE=rpc requires RPC_URL or ETHEREUM_RPC_URL");
            };
            Url::parse(rpc_url).map_err(|e| anyhow::anyhow!("Invalid RPC_URL: {}", e))?;
        }

        if self.history_window_days == 0 {
            anyhow::bail!("HISTORY_WINDOW_DAYS must be > 0");
        }

        if self.native_price_asset_id.trim().is_empty() {
            tracing::warn!("NATIVE_PRICE_ASSET_ID is empty; native price lookups will fall back");
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }
}

// Internal helper that reads an env var and treats blank values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
pub(crate) fn test_config(explorer_url: &str, price_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: DEFAULT_PORT,
        environment: "test".to_string(),
        etherscan_api_key: "test-key".to_string(),
        etherscan_api_url: explorer_url.to_string(),
        coingecko_api_url: price_url.to_string(),
        coingecko_api_key: None,
        native_price_asset_id: NATIVE_PRICE_ASSET_ID.to_string(),
        ethereum_rpc_url: None,
        balance_source: BalanceSource::Explorer,
        history_window_days: HISTORY_WINDOW_DAYS_DEFAULT,
        history_filter: HistoryFilter::ServerSide,
        cors_allowed_origins: "*".to_string(),
    }
}
