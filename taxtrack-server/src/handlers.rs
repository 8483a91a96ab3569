use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use taxtrack_core::{IncomeDraft, IncomeId, IncomeRecord, TaxSummary};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_incomes(
    State(state): State<AppState>,
) -> Result<Json<Vec<IncomeRecord>>, ApiError> {
    let records = state.ledger.list().await?;
    Ok(Json(records))
}

/// The body extractor goes last and its rejection is handled here, so bad
/// JSON gets the same error body as a failed validation.
pub async fn create_income(
    State(state): State<AppState>,
    body: Result<Json<IncomeDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<IncomeRecord>), ApiError> {
    let Json(draft) = body?;
    let record = state.ledger.add(draft).await?;
    info!(id = record.id, job_name = %record.job_name, "income recorded");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_income(
    State(state): State<AppState>,
    id: Result<Path<IncomeId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.ledger.remove(id).await?;
    info!(id, "income removed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn tax_summary(State(state): State<AppState>) -> Result<Json<TaxSummary>, ApiError> {
    let summary = state.ledger.summarize(&state.calculator).await?;
    Ok(Json(summary))
}
