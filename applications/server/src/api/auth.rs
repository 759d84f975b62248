/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::auth::{validate_email, validate_password},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use vibe_core::User;
use vibe_storage::StorageError;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: Option<String>,
}

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(req) = payload?;

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ServerError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }
    let email = validate_email(&req.email)?;
    validate_password(&req.password)?;

    let password_hash = app_state.auth_service.hash_password(&req.password)?;
    let user = vibe_storage::users::create(&app_state.pool, &email, &password_hash)
        .await
        .map_err(|e| match e {
            StorageError::Duplicate { .. } => {
                ServerError::Conflict("Email already registered".to_string())
            }
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(req) = payload?;

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ServerError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }
    let email = req.email.trim().to_lowercase();

    let credentials = vibe_storage::users::get_credentials_by_email(&app_state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &credentials.password_hash)?
    {
        return Err(invalid_credentials());
    }

    let token = app_state.auth_service.issue_token(credentials.user.id)?;

    Ok(Json(LoginResponse {
        token,
        user: credentials.user,
    }))
}

/// DELETE /api/auth/account
///
/// Removes the user along with every observation and recommended track.
pub async fn delete_account(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    payload: std::result::Result<Json<DeleteAccountRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(req) = payload?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Password is required".to_string()))?;

    let password_hash = vibe_storage::users::get_password_hash(&app_state.pool, auth.id())
        .await?
        .ok_or_else(account_gone)?;

    if !app_state
        .auth_service
        .verify_password(&password, &password_hash)?
    {
        return Err(ServerError::Auth("Invalid password".to_string()));
    }

    // A concurrent delete may have removed the row after the hash lookup
    if !vibe_storage::users::delete(&app_state.pool, auth.id()).await? {
        return Err(account_gone());
    }

    tracing::info!(user_id = %auth.id(), "Account deleted");

    Ok(Json(json!({ "message": "Account deleted successfully" })))
}

fn account_gone() -> ServerError {
    ServerError::Auth("User not found".to_string())
}

fn invalid_credentials() -> ServerError {
    ServerError::Auth("Invalid email or password".to_string())
}
