use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::{
    error::{AppError, JobError},
    models::JobSuccess,
};

use super::AppState;

/// POST /
///
/// Runs a wallet profile job. Success is always HTTP 200; failures carry the
/// job result error body with the matching status.
pub async fn run_job(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<JobSuccess>, JobError> {
    let Json(input) = payload.map_err(|rejection| {
        JobError::new(None, AppError::Validation(rejection.body_text()))
    })?;
    tracing::debug!("POST Data: {}", input);

    state
        .profiler
        .create_request(&input)
        .await
        .map(Json)
        .map_err(|err| {
            tracing::error!("Error: {}", err);
            err
        })
}
