//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{AppError, AppState, AuthUser};
use spendwise_core::DashboardSummary;

/// GET /api/dashboard - Totals, recent activity, 7-day trend and budget usage
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DashboardSummary>, AppError> {
    let transactions = state.db.all_transactions(auth.user.id)?;
    let today = chrono::Local::now().date_naive();

    Ok(Json(DashboardSummary::from_transactions(
        &transactions,
        auth.user.budget,
        today,
    )))
}
