//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use spendwise_core::db::{TransactionFilter, DEFAULT_LIMIT};
use spendwise_core::models::{
    Category, NewTransaction, Transaction, TransactionType, TransactionUpdate,
};

/// Query parameters for listing transactions
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// income or expense
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    /// Start date (YYYY-MM-DD), inclusive
    pub from: Option<String>,
    /// End date (YYYY-MM-DD), inclusive
    pub to: Option<String>,
    /// Search query (matches the title)
    pub search: Option<String>,
}

impl TransactionQuery {
    fn into_filter(self) -> Result<TransactionFilter, AppError> {
        let transaction_type = self
            .transaction_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<TransactionType>())
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?;

        let category = self
            .category
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<Category>())
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?;

        let from = parse_date_param("from", self.from.as_deref())?;
        let to = parse_date_param("to", self.to.as_deref())?;
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(AppError::bad_request("'from' must not be after 'to'"));
            }
        }

        Ok(TransactionFilter::new()
            .transaction_type(transaction_type)
            .category(category)
            .date_range(from, to)
            .search(self.search)
            .limit(Some(self.limit.unwrap_or(DEFAULT_LIMIT)))
            .offset(self.offset))
    }
}

fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::bad_request(&format!("Invalid '{}' date, expected YYYY-MM-DD", name))
            }),
    }
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transactions: Vec<Transaction>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/transactions - List the caller's transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionResponse>, AppError> {
    let filter = params.into_filter()?;

    let transactions = state.db.list_transactions(auth.user.id, &filter)?;
    let total = state.db.count_transactions(auth.user.id, &filter)?;

    Ok(Json(TransactionResponse {
        transactions,
        total,
        limit: filter.effective_limit(),
        offset: filter.effective_offset(),
    }))
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = state.db.insert_transaction(auth.user.id, &body)?;

    state.db.log_audit(
        &auth.user.email,
        "create",
        Some("transaction"),
        Some(transaction.id),
        Some(&format!(
            "{} {} {}",
            transaction.transaction_type, transaction.amount, transaction.category
        )),
    )?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .db
        .get_transaction(auth.user.id, id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    Ok(Json(transaction))
}

/// PATCH /api/transactions/:id - Partially update a transaction
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<TransactionUpdate>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .db
        .update_transaction(auth.user.id, id, &body)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    state.db.log_audit(
        &auth.user.email,
        "update",
        Some("transaction"),
        Some(id),
        None,
    )?;

    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_transaction(auth.user.id, id)? {
        return Err(AppError::not_found("Transaction not found"));
    }

    state.db.log_audit(
        &auth.user.email,
        "delete",
        Some("transaction"),
        Some(id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_into_filter() {
        let query = TransactionQuery {
            transaction_type: Some("Expense".to_string()),
            category: Some("food".to_string()),
            from: Some("2024-01-01".to_string()),
            to: Some("2024-01-31".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.transaction_type, Some(TransactionType::Expense));
        assert_eq!(filter.category, Some(Category::Food));
        assert_eq!(filter.effective_limit(), 10);
    }

    #[test]
    fn test_query_rejects_bad_values() {
        let bad_type = TransactionQuery {
            transaction_type: Some("refund".to_string()),
            ..Default::default()
        };
        assert!(bad_type.into_filter().is_err());

        let bad_date = TransactionQuery {
            from: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        assert!(bad_date.into_filter().is_err());

        let reversed = TransactionQuery {
            from: Some("2024-02-01".to_string()),
            to: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(reversed.into_filter().is_err());
    }
}
