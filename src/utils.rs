// Utility helpers

use ethers::types::U256;
use serde::Serializer;

use crate::error::{AppError, Result};

/// Serializes a `U256` as a base-10 string instead of the default hex form.
pub fn u256_as_decimal<S>(value: &U256, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// Parses an explorer integer field, which may come as a decimal string or a number.
pub fn parse_u256(value: &serde_json::Value, field: &str) -> Result<U256> {
    let parsed = match value {
        serde_json::Value::String(text) => U256::from_dec_str(text.trim()).ok(),
        serde_json::Value::Number(number) => number.as_u64().map(U256::from),
        _ => None,
    };
    parsed.ok_or_else(|| AppError::Upstream(format!("Invalid {} value: {}", field, value)))
}

// Internal helper that checks conditions for `is_valid_evm_address`.
pub fn is_valid_evm_address(value: &str) -> bool {
    let normalized = value.trim();
    normalized.starts_with("0x")
        && normalized.len() == 42
        && normalized[2..].chars().all(|c| c.is_ascii_hexdigit())
}
