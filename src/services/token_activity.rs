use futures_util::future::try_join_all;
use serde_json::Value;
use std::collections::HashSet;

use crate::{
    error::{AppError, Result},
    models::TokenBalanceEntry,
};

use super::explorer::{ExplorerClient, ListBounds};

/// Distinct token contracts touched by a transfer list, in first-seen order.
///
/// Contracts compare case-insensitively; the first spelling seen is kept.
pub fn distinct_token_contracts(transfers: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    transfers
        .iter()
        .filter_map(|transfer| transfer.get("contractAddress").and_then(Value::as_str))
        .map(str::trim)
        .filter(|contract| !contract.is_empty())
        .filter(|contract| seen.insert(contract.to_ascii_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Fetches metadata and balance for every token the wallet has moved and keeps
/// the ones it still holds.
///
/// A failed lookup for any single token fails the whole fetch; the error names
/// the contract.
pub async fn fetch_token_balances(
    explorer: &ExplorerClient,
    address: &str,
) -> Result<Vec<TokenBalanceEntry>> {
    let transfers = explorer
        .token_transfers(address, ListBounds::Unbounded)
        .await?;
    let contracts = distinct_token_contracts(&transfers);
    tracing::debug!(
        "Wallet {} touched {} token contracts across {} transfers",
        address,
        contracts.len(),
        transfers.len()
    );

    let entries = try_join_all(
        contracts
            .into_iter()
            .map(|contract| fetch_token_entry(explorer, address, contract)),
    )
    .await?;

    Ok(entries
        .into_iter()
        .filter(|entry| !entry.balance.is_zero())
        .collect())
}

async fn fetch_token_entry(
    explorer: &ExplorerClient,
    address: &str,
    contract: String,
) -> Result<TokenBalanceEntry> {
    let (info, balance) = tokio::try_join!(
        explorer.token_info(&contract),
        explorer.token_balance(address, &contract),
    )
    .map_err(|err| match err {
        AppError::Upstream(msg) => AppError::Upstream(format!("token {}: {}", contract, msg)),
        other => other,
    })?;

    Ok(TokenBalanceEntry {
        token_address: contract,
        symbol: info.symbol,
        name: info.name,
        decimals: info.decimals,
        balance,
    })
}
