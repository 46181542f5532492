use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, U256},
};
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    config::{BalanceSource, Config},
    error::{AppError, Result},
};

use super::explorer::ExplorerClient;

#[async_trait::async_trait]
pub trait NativeBalanceSource: Send + Sync {
    /// Native balance in the smallest unit (wei).
    async fn native_balance(&self, address: &str) -> Result<U256>;
}

/// Reads the balance with `eth_getBalance` on a JSON-RPC node.
pub struct RpcBalanceSource {
    provider: Provider<Http>,
}

impl RpcBalanceSource {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| AppError::Internal(format!("Invalid EVM RPC URL: {}", e)))?;
        Ok(Self { provider })
    }
}

#[async_trait::async_trait]
impl NativeBalanceSource for RpcBalanceSource {
    async fn native_balance(&self, address: &str) -> Result<U256> {
        let addr = Address::from_str(address)
            .map_err(|_| AppError::Validation("Invalid EVM address".to_string()))?;
        self.provider
            .get_balance(addr, None)
            .await
            .map_err(|e| AppError::Upstream(format!("eth_getBalance failed: {}", e)))
    }
}

/// Reads the balance from the explorer's account balance endpoint.
pub struct ExplorerBalanceSource {
    explorer: ExplorerClient,
}

impl ExplorerBalanceSource {
    pub fn new(explorer: ExplorerClient) -> Self {
        Self { explorer }
    }
}

#[async_trait::async_trait]
impl NativeBalanceSource for ExplorerBalanceSource {
    async fn native_balance(&self, address: &str) -> Result<U256> {
        self.explorer.native_balance(address).await
    }
}

pub fn balance_source_from_config(
    config: &Config,
    explorer: ExplorerClient,
) -> Result<Arc<dyn NativeBalanceSource>> {
    match config.balance_source {
        BalanceSource::Rpc => {
            let rpc_url = config.ethereum_rpc_url.as_deref().ok_or_else(|| {
                AppError::Internal("RPC balance source selected without RPC_URL".to_string())
            })?;
            tracing::info!("Native balance source: JSON-RPC node");
            Ok(Arc::new(RpcBalanceSource::new(rpc_url)?))
        }
        BalanceSource::Explorer => {
            tracing::info!("Native balance source: explorer API");
            Ok(Arc::new(ExplorerBalanceSource::new(explorer)))
        }
    }
}
