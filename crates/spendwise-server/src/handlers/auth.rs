//! Authentication-related handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use spendwise_core::models::{NewUser, User};

/// Request body for POST /api/auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus profile returned on register and login
#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

/// Request body for PATCH /api/me/budget
#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    /// `null` clears the budget
    pub budget: Option<f64>,
}

/// POST /api/auth/register - Create an account and start a session
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let user = state.db.create_user(&body)?;
    let token = state
        .db
        .create_session(user.id, state.config.session_ttl())?;

    state
        .db
        .log_audit(&user.email, "register", Some("user"), Some(user.id), None)?;
    info!(user = %user.email, "User registered");

    Ok((StatusCode::CREATED, Json(SessionResponse { token, user })))
}

/// POST /api/auth/login - Exchange credentials for a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let Some(user) = state.db.verify_credentials(&body.email, &body.password)? else {
        return Err(AppError::unauthorized("Invalid email or password"));
    };

    let token = state
        .db
        .create_session(user.id, state.config.session_ttl())?;

    state
        .db
        .log_audit(&user.email, "login", Some("user"), Some(user.id), None)?;

    Ok(Json(SessionResponse { token, user }))
}

/// POST /api/auth/logout - End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_session(&auth.token)?;

    state.db.log_audit(
        &auth.user.email,
        "logout",
        Some("user"),
        Some(auth.user.id),
        None,
    )?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/me - Get the currently authenticated user
pub async fn get_me(Extension(auth): Extension<AuthUser>) -> Json<User> {
    Json(auth.user)
}

/// PATCH /api/me/budget - Set or clear the spending budget
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<BudgetRequest>,
) -> Result<Json<User>, AppError> {
    let user = state.db.update_budget(auth.user.id, body.budget)?;

    let details = match body.budget {
        Some(limit) => format!("budget={}", limit),
        None => "budget cleared".to_string(),
    };
    state.db.log_audit(
        &user.email,
        "update",
        Some("budget"),
        Some(user.id),
        Some(&details),
    )?;

    Ok(Json(user))
}
