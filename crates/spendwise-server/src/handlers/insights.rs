//! Insight handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::{AppError, AppState, AuthUser};
use spendwise_core::insights::{Insight, InsightEngine};

/// Response for GET /api/insights
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<String>,
}

/// GET /api/insights - Rendered insight strings for the caller
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<InsightsResponse>, AppError> {
    let transactions = state.db.all_transactions(auth.user.id)?;
    let insights = InsightEngine::new().generate(&transactions);

    Ok(Json(InsightsResponse { insights }))
}

/// GET /api/insights/detailed - Structured insights with tag, severity and data
pub async fn get_detailed_insights(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let transactions = state.db.all_transactions(auth.user.id)?;

    Ok(Json(InsightEngine::new().analyze(&transactions)))
}
