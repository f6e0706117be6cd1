use crate::auth::token::Token;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Credentials posted to `/accounts/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Credentials posted to `/accounts/register`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login (and register) response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Compact HS512 JWT
    pub token: String,
    /// HTTP status code mirrored into the body
    pub status: u16,
}

impl From<Token> for LoginResponse {
    fn from(token: Token) -> Self {
        Self {
            token: token.value,
            status: 200,
        }
    }
}

/// Body of `GET /accounts/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountInfo {
    pub username: String,
    /// Token expiry (unix seconds)
    pub exp: i64,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// A single validation message, optionally tied to a request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    /// Message not bound to a field (store-reported rule violations).
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

// ============= Token Types =============

/// JWT claim set. Only the username is carried besides the expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: i64,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Unknown email or wrong password. Both map here so callers cannot tell them apart.
    #[error("Bad credentials")]
    InvalidCredentials,

    #[error("Account already exists: {}", .0.join("; "))]
    DuplicateAccount(Vec<String>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Identity store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::DuplicateAccount(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The body sent to the client. Store and internal details stay in the logs.
    pub fn body(&self) -> ErrorBody {
        let (error, errors) = match self {
            AppError::Validation(errors) => ("Validation failed".to_string(), errors.clone()),
            AppError::InvalidCredentials => ("Bad credentials".to_string(), Vec::new()),
            AppError::DuplicateAccount(messages) => (
                "Account already exists".to_string(),
                messages.iter().cloned().map(FieldError::general).collect(),
            ),
            AppError::Unauthorized => ("Unauthorized".to_string(), Vec::new()),
            AppError::Store(_) | AppError::Internal(_) => {
                ("Internal server error".to_string(), Vec::new())
            }
        };

        ErrorBody { error, errors }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, axum::Json(self.body())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
