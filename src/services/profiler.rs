use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    config::Config,
    error::{JobError, Result},
    models::{JobSuccess, ValidatedJob, WalletProfile},
};

use super::{
    balance::{balance_source_from_config, NativeBalanceSource},
    explorer::ExplorerClient,
    history::{fetch_transaction_history, HistoryOptions},
    price::{CoinGeckoClient, PriceSource},
    token_activity::fetch_token_balances,
    validator::validate_job_request,
    valuation::calculate_total_value,
};

/// Answers wallet profile jobs: validate, fan out to the upstreams, value, assemble.
pub struct WalletProfiler {
    explorer: ExplorerClient,
    balances: Arc<dyn NativeBalanceSource>,
    prices: Arc<dyn PriceSource>,
    native_asset_id: String,
    history: HistoryOptions,
}

impl WalletProfiler {
    pub fn new(
        explorer: ExplorerClient,
        balances: Arc<dyn NativeBalanceSource>,
        prices: Arc<dyn PriceSource>,
        native_asset_id: String,
        history: HistoryOptions,
    ) -> Self {
        Self {
            explorer,
            balances,
            prices,
            native_asset_id,
            history,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::new();
        let explorer = ExplorerClient::from_config(client.clone(), config);
        let balances = balance_source_from_config(config, explorer.clone())?;
        let prices = Arc::new(CoinGeckoClient::from_config(client, config));

        Ok(Self::new(
            explorer,
            balances,
            prices,
            config.native_price_asset_id.clone(),
            HistoryOptions {
                window_days: config.history_window_days,
                filter: config.history_filter,
            },
        ))
    }

    /// Runs one job request end to end.
    ///
    /// Every failure comes back as a `JobError` carrying the job id when it
    /// could be read; there is no partial result.
    pub async fn create_request(&self, input: &Value) -> std::result::Result<JobSuccess, JobError> {
        let job = validate_job_request(input)?;
        tracing::info!("Processing request {} for wallet {}", job.id, job.address);

        match self.profile(&job).await {
            Ok(profile) => Ok(JobSuccess::new(job.id, profile)),
            Err(error) => Err(JobError::new(Some(job.id), error)),
        }
    }

    async fn profile(&self, job: &ValidatedJob) -> Result<WalletProfile> {
        let address = job.address.as_str();
        let (eth_balance, token_balances, transactions) = tokio::try_join!(
            self.balances.native_balance(address),
            fetch_token_balances(&self.explorer, address),
            fetch_transaction_history(&self.explorer, address, self.history, Utc::now()),
        )?;

        let total_value = calculate_total_value(
            self.prices.as_ref(),
            &self.native_asset_id,
            eth_balance,
            &token_balances,
        )
        .await;

        Ok(WalletProfile::assemble(
            eth_balance,
            token_balances,
            transactions,
            total_value,
        ))
    }
}
