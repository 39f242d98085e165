//! Axum route handlers for the Analytics API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::analytics::engine::{evaluate, EvaluationReport};
use crate::analytics::stats::BestModelPolicy;
use crate::errors::AppError;
use crate::models::evaluation::EvaluationBundle;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluateQuery {
    /// `auc` or a model key; overrides the configured policy for this call.
    pub best_model: Option<String>,
}

/// POST /api/v1/analytics/evaluate
///
/// Derives the full analytics report from one evaluation bundle.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Query(query): Query<EvaluateQuery>,
    Json(bundle): Json<EvaluationBundle>,
) -> Result<Json<EvaluationReport>, AppError> {
    let policy = match query.best_model.as_deref() {
        Some(raw) => BestModelPolicy::parse(raw).ok_or_else(|| {
            AppError::Validation(format!("best_model must be 'auc' or a model key, got '{raw}'"))
        })?,
        None => state.config.best_model_policy,
    };

    let report = evaluate(&bundle, policy, &state.canvas)?;
    info!(
        "Evaluation report built; best model {} (AUC leader {})",
        report.best_model.selected, report.best_model.auc_leader
    );

    Ok(Json(report))
}
