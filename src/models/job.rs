use serde::Serialize;

use super::WalletProfile;

/// Job request after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedJob {
    pub id: String,
    pub address: String,
}

// ==================== JOB RESULT ====================
#[derive(Debug, Serialize)]
pub struct JobSuccess {
    #[serde(rename = "jobRunID")]
    pub job_run_id: String,
    pub data: WalletProfile,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl JobSuccess {
    pub fn new(job_run_id: String, data: WalletProfile) -> Self {
        Self {
            job_run_id,
            data,
            status_code: 200,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobFailure {
    #[serde(rename = "jobRunID")]
    pub job_run_id: Option<String>,
    pub status: &'static str,
    pub error: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl JobFailure {
    pub fn new(job_run_id: Option<String>, error: String, status_code: u16) -> Self {
        Self {
            job_run_id,
            status: "errored",
            error,
            status_code,
        }
    }
}
