//! Login endpoint
//!
//! Legacy-shaped login: the response fields (including the redundant
//! `issuccess`/`success` pair) are consumed by existing clients and must
//! keep their exact shape.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::authenticate;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub issuccess: String,
    pub success: i64,
    pub userid: i64,
    pub loccode: String,
    pub username: String,
    pub roleid: i64,
    pub message: String,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = authenticate(state.gateway.as_ref(), &request.email, &request.password).await?;

    tracing::info!(userid = user.userid, "login succeeded");
    Ok(Json(LoginResponse {
        issuccess: "True".to_string(),
        success: 1,
        userid: user.userid,
        loccode: user.loccode,
        username: user.username,
        roleid: user.roleid,
        message: "You have successfully logged in.".to_string(),
    }))
}
