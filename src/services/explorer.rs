use ethers::types::U256;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::{
    config::Config,
    constants::{
        EXPLORER_NO_RECORDS_MESSAGES, EXPLORER_STATUS_OK, HISTORY_END_BLOCK, HISTORY_START_BLOCK,
    },
    error::{AppError, Result},
    utils::parse_u256,
};

/// Optional bound applied to explorer list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListBounds {
    Unbounded,
    StartTime(i64),
    FullBlockRange,
}

impl ListBounds {
    fn params(self) -> Vec<(&'static str, String)> {
        match self {
            ListBounds::Unbounded => vec![],
            ListBounds::StartTime(start) => vec![("starttime", start.to_string())],
            ListBounds::FullBlockRange => vec![
                ("startblock", HISTORY_START_BLOCK.to_string()),
                ("endblock", HISTORY_END_BLOCK.to_string()),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
}

#[derive(Debug, Deserialize)]
struct ExplorerEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

impl ExplorerEnvelope {
    fn is_ok(&self) -> bool {
        self.status == EXPLORER_STATUS_OK
    }

    // Status "0" with an empty array and a "No ... found" message means no records.
    fn is_empty_listing(&self) -> bool {
        let message = self.message.trim();
        !self.is_ok()
            && self.result.as_array().is_some_and(|items| items.is_empty())
            && EXPLORER_NO_RECORDS_MESSAGES
                .iter()
                .any(|known| known.eq_ignore_ascii_case(message))
    }

    fn into_error(self, context: &str) -> AppError {
        let detail = match self.result.as_str() {
            Some(text) if !text.is_empty() && text != self.message => format!(" ({})", text),
            _ => String::new(),
        };
        AppError::Upstream(format!("{}: {}{}", context, self.message, detail))
    }

    fn into_result(self, context: &str) -> Result<Value> {
        if self.is_ok() {
            return Ok(self.result);
        }
        Err(self.into_error(context))
    }

    fn into_records(self, context: &str) -> Result<Vec<Value>> {
        if self.is_empty_listing() {
            return Ok(Vec::new());
        }
        match self.into_result(context)? {
            Value::Array(items) => Ok(items),
            other => Err(AppError::Upstream(format!(
                "{}: expected a list, got {}",
                context, other
            ))),
        }
    }
}

/// Etherscan-compatible explorer client.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ExplorerClient {
    pub fn new(client: reqwest::Client, api_url: String, api_key: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            config.etherscan_api_url.clone(),
            config.etherscan_api_key.clone(),
        )
    }

    fn request_url(&self, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::Internal(format!("Invalid explorer URL: {}", e)))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("apikey", &self.api_key);
        }
        Ok(url)
    }

    async fn call(&self, params: &[(&str, String)]) -> Result<ExplorerEnvelope> {
        let url = self.request_url(params)?;
        let envelope = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Explorer request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Upstream(format!("Explorer returned error status: {}", e)))?
            .json::<ExplorerEnvelope>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid explorer payload: {}", e)))?;
        Ok(envelope)
    }

    /// `module=account&action=balance`
    pub async fn native_balance(&self, address: &str) -> Result<U256> {
        let result = self
            .call(&[
                ("module", "account".to_string()),
                ("action", "balance".to_string()),
                ("address", address.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?
            .into_result("Error getting balance")?;
        parse_u256(&result, "balance")
    }

    /// `module=account&action=tokentx`, newest first.
    pub async fn token_transfers(&self, address: &str, bounds: ListBounds) -> Result<Vec<Value>> {
        self.list("tokentx", address, bounds).await
    }

    /// `module=account&action=txlist`, newest first.
    pub async fn normal_transactions(
        &self,
        address: &str,
        bounds: ListBounds,
    ) -> Result<Vec<Value>> {
        self.list("txlist", address, bounds).await
    }

    async fn list(&self, action: &str, address: &str, bounds: ListBounds) -> Result<Vec<Value>> {
        let mut params = vec![
            ("module", "account".to_string()),
            ("action", action.to_string()),
            ("address", address.to_string()),
            ("sort", "desc".to_string()),
        ];
        params.extend(bounds.params());
        self.call(&params)
            .await?
            .into_records("Etherscan API error")
    }

    /// `module=token&action=tokeninfo`
    pub async fn token_info(&self, contract_address: &str) -> Result<TokenInfo> {
        let result = self
            .call(&[
                ("module", "token".to_string()),
                ("action", "tokeninfo".to_string()),
                ("contractaddress", contract_address.to_string()),
            ])
            .await?
            .into_result("Error getting token info")?;
        parse_token_info(&result)
    }

    /// `module=account&action=tokenbalance`
    pub async fn token_balance(&self, address: &str, contract_address: &str) -> Result<U256> {
        let result = self
            .call(&[
                ("module", "account".to_string()),
                ("action", "tokenbalance".to_string()),
                ("contractaddress", contract_address.to_string()),
                ("address", address.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?
            .into_result("Error getting token balance")?;
        parse_u256(&result, "token balance")
    }
}

// Internal helper that reads the first tokeninfo entry; decimals fall back to `divisor`.
fn parse_token_info(result: &Value) -> Result<TokenInfo> {
    let info = match result {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(result),
        _ => None,
    }
    .ok_or_else(|| AppError::Upstream("Error getting token info: empty result".to_string()))?;

    let text = |keys: &[&str]| -> Option<String> {
        keys.iter().find_map(|key| match info.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    };

    let decimals = text(&["decimals", "divisor"])
        .and_then(|raw| raw.parse::<u32>().ok())
        .ok_or_else(|| {
            AppError::Upstream(format!("Error getting token info: invalid decimals in {}", info))
        })?;

    Ok(TokenInfo {
        symbol: text(&["symbol"]).unwrap_or_default(),
        name: text(&["name", "tokenName"]).unwrap_or_default(),
        decimals,
    })
}
