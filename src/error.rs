use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::JobFailure;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A failed job: the error plus the job id, when the request carried one.
#[derive(Debug, Clone, PartialEq)]
pub struct JobError {
    pub job_run_id: Option<String>,
    pub error: AppError,
}

impl JobError {
    pub fn new(job_run_id: Option<String>, error: AppError) -> Self {
        Self { job_run_id, error }
    }

    pub fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.job_run_id {
            Some(id) => write!(f, "job {}: {}", id, self.error),
            None => write!(f, "job <unknown>: {}", self.error),
        }
    }
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(JobFailure::new(
            self.job_run_id,
            self.error.to_string(),
            status.as_u16(),
        ));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
