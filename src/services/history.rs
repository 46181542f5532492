use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    config::HistoryFilter, constants::SECONDS_PER_DAY, error::Result, models::TransactionHistory,
};

use super::explorer::{ExplorerClient, ListBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    pub window_days: u32,
    pub filter: HistoryFilter,
}

/// Start of the trailing window, in seconds since epoch.
pub fn window_cutoff(now: DateTime<Utc>, window_days: u32) -> i64 {
    now.timestamp() - i64::from(window_days) * SECONDS_PER_DAY
}

// Internal helper that reads the explorer's `timeStamp` (string or number).
fn record_timestamp(record: &Value) -> Option<i64> {
    match record.get("timeStamp")? {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_i64(),
        _ => None,
    }
}

/// Keeps the records inside the window.
///
/// Server-side filtering is inclusive of the cutoff instant (`starttime`
/// semantics); client-side filtering is strict.
pub fn filter_window(records: Vec<Value>, cutoff: i64, filter: HistoryFilter) -> Vec<Value> {
    records
        .into_iter()
        .filter(|record| match (record_timestamp(record), filter) {
            (Some(ts), HistoryFilter::ServerSide) => ts >= cutoff,
            (Some(ts), HistoryFilter::ClientSide) => ts > cutoff,
            (None, _) => false,
        })
        .collect()
}

pub async fn fetch_transaction_history(
    explorer: &ExplorerClient,
    address: &str,
    options: HistoryOptions,
    now: DateTime<Utc>,
) -> Result<TransactionHistory> {
    let cutoff = window_cutoff(now, options.window_days);
    let bounds = match options.filter {
        HistoryFilter::ServerSide => ListBounds::StartTime(cutoff),
        HistoryFilter::ClientSide => ListBounds::FullBlockRange,
    };

    let (normal, token) = tokio::try_join!(
        explorer.normal_transactions(address, bounds),
        explorer.token_transfers(address, bounds),
    )?;

    let history = TransactionHistory {
        normal_transactions: filter_window(normal, cutoff, options.filter),
        token_transactions: filter_window(token, cutoff, options.filter),
    };
    tracing::debug!(
        "History for {} since {}: {} normal, {} token",
        address,
        cutoff,
        history.normal_transactions.len(),
        history.token_transactions.len()
    );
    Ok(history)
}
