use ethers::types::U256;
use serde::Serialize;

use crate::utils::u256_as_decimal;

// ==================== TOKENS ====================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceEntry {
    pub token_address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    #[serde(serialize_with = "u256_as_decimal")]
    pub balance: U256,
}

// ==================== HISTORY ====================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHistory {
    pub normal_transactions: Vec<serde_json::Value>,
    pub token_transactions: Vec<serde_json::Value>,
}

// ==================== PROFILE ====================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletProfile {
    #[serde(serialize_with = "u256_as_decimal")]
    pub eth_balance: U256,
    pub token_balances: Vec<TokenBalanceEntry>,
    pub transactions: TransactionHistory,
    #[serde(serialize_with = "u256_as_decimal")]
    pub total_value: U256,
    pub normal_tx_count: usize,
    pub token_tx_count: usize,
    /// Same value as `total_value`; oracle nodes read `data.result`.
    #[serde(serialize_with = "u256_as_decimal")]
    pub result: U256,
}

impl WalletProfile {
    pub fn assemble(
        eth_balance: U256,
        token_balances: Vec<TokenBalanceEntry>,
        transactions: TransactionHistory,
        total_value: U256,
    ) -> Self {
        Self {
            eth_balance,
            token_balances,
            normal_tx_count: transactions.normal_transactions.len(),
            token_tx_count: transactions.token_transactions.len(),
            transactions,
            total_value,
            result: total_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assemble_counts_history_entries() {
        // Memastikan jumlah transaksi diambil dari daftar riwayat
        let history = TransactionHistory {
            normal_transactions: vec![json!({"hash": "0x1"}), json!({"hash": "0x2"})],
            token_transactions: vec![json!({"hash": "0x3"})],
        };
        let profile = WalletProfile::assemble(U256::from(5u64), vec![], history, U256::from(9u64));
        assert_eq!(profile.normal_tx_count, 2);
        assert_eq!(profile.token_tx_count, 1);
        assert_eq!(profile.result, profile.total_value);
    }

    #[test]
    fn profile_serializes_camel_case_decimal_strings() {
        let token = TokenBalanceEntry {
            token_address: "0xabc".to_string(),
            symbol: "FOO".to_string(),
            name: "Foo Token".to_string(),
            decimals: 0,
            balance: U256::from(5u64),
        };
        let profile = WalletProfile::assemble(
            U256::exp10(18),
            vec![token],
            TransactionHistory::default(),
            U256::exp10(19),
        );
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["ethBalance"], "1000000000000000000");
        assert_eq!(value["totalValue"], "10000000000000000000");
        assert_eq!(value["tokenBalances"][0]["tokenAddress"], "0xabc");
        assert_eq!(value["tokenBalances"][0]["balance"], "5");
        assert_eq!(value["transactions"]["normalTransactions"], json!([]));
        assert_eq!(value["tokenTxCount"], 0);
    }
}
