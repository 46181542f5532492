use serde_json::Value;

use crate::{
    error::{AppError, JobError},
    models::ValidatedJob,
    utils::is_valid_evm_address,
};

/// Accepted names for the wallet field, in order of preference.
const WALLET_FIELDS: [&str; 2] = ["wallet", "walletAddress"];

/// Checks the raw job request and extracts `{ id, address }`.
pub fn validate_job_request(input: &Value) -> Result<ValidatedJob, JobError> {
    let id = match input.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        Some(_) => return Err(invalid(None, "Job id must be a non-empty string")),
        None => return Err(invalid(None, "Required parameter not supplied: id")),
    };

    let Some(data) = input.get("data").and_then(Value::as_object) else {
        return Err(invalid(Some(&id), "Required parameter not supplied: data"));
    };

    let Some(raw) = WALLET_FIELDS.iter().find_map(|field| data.get(*field)) else {
        return Err(invalid(Some(&id), "Required parameter not supplied: wallet"));
    };
    let Some(address) = raw.as_str().map(str::trim).filter(|a| !a.is_empty()) else {
        return Err(invalid(Some(&id), "Wallet address must be a non-empty string"));
    };
    if !is_valid_evm_address(address) {
        return Err(invalid(
            Some(&id),
            "Invalid wallet address format (expected 0x + 40 hex chars)",
        ));
    }

    Ok(ValidatedJob {
        id,
        address: address.to_string(),
    })
}

fn invalid(id: Option<&str>, message: &str) -> JobError {
    JobError::new(
        id.map(str::to_string),
        AppError::Validation(message.to_string()),
    )
}
