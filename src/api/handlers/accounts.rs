use crate::{
    auth::middleware::AuthUser,
    types::{
        AccountInfo, AppError, ErrorBody, FieldError, LoginRequest, LoginResponse,
        RegisterRequest, Result,
    },
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

/// Turns a rejected JSON body into the shared error shape.
fn body_or_reject<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(vec![FieldError::general(rejection.body_text())]))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/accounts/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Bad credentials or invalid input", body = ErrorBody),
        (status = 500, description = "Identity store failure", body = ErrorBody)
    ),
    tag = "accounts"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let payload = body_or_reject(payload)?;

    let token = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse::from(token)))
}

/// Register a new account and log it in
#[utoipa::path(
    post,
    path = "/accounts/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created and logged in", body = LoginResponse),
        (status = 400, description = "Invalid input or account already exists", body = ErrorBody),
        (status = 500, description = "Identity store failure", body = ErrorBody)
    ),
    tag = "accounts"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let payload = body_or_reject(payload)?;

    let token = state
        .auth_service
        .register(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse::from(token)))
}

/// Claims of the presented bearer token
#[utoipa::path(
    get,
    path = "/accounts/me",
    responses(
        (status = 200, description = "Token is valid", body = AccountInfo),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "accounts"
)]
pub async fn me(AuthUser(claims): AuthUser) -> Json<AccountInfo> {
    Json(AccountInfo {
        username: claims.username,
        exp: claims.exp,
    })
}
