use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Permission Denied: {0}")]
    PermissionDenied(String),

    #[error("Email or username already in use")]
    DuplicateIdentity,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password is too weak")]
    WeakPassword,

    #[error("New password can't be the same as the old one")]
    SamePassword,

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Transaction aborted: {0}")]
    TransactionFailure(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    /// Maps a store error raised by one step of an atomic unit.
    pub fn aborted(step: &'static str) -> impl FnOnce(DbErr) -> AppError {
        move |e| AppError::TransactionFailure(format!("{}: {}", step, e))
    }

    /// Maps an insert error, turning unique-constraint violations into `DuplicateIdentity`.
    pub fn from_insert(e: DbErr) -> AppError {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateIdentity,
            _ => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::DuplicateIdentity => (
                StatusCode::CONFLICT,
                "Email or username already in use".to_string(),
            ),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Incorrect login info".to_string())
            }
            AppError::WeakPassword => (
                StatusCode::BAD_REQUEST,
                "Please choose a stronger password".to_string(),
            ),
            AppError::SamePassword => (
                StatusCode::BAD_REQUEST,
                "New password can't be the same as the old one".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            AppError::TransactionFailure(msg) => {
                tracing::error!("Transaction aborted: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::PermissionDenied("x".into()), StatusCode::FORBIDDEN),
            (AppError::DuplicateIdentity, StatusCode::CONFLICT),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::WeakPassword, StatusCode::BAD_REQUEST),
            (AppError::SamePassword, StatusCode::BAD_REQUEST),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                AppError::TransactionFailure("delete items: boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_aborted_keeps_step_name() {
        let err = AppError::aborted("delete items")(DbErr::Custom("boom".into()));
        match err {
            AppError::TransactionFailure(msg) => assert!(msg.starts_with("delete items")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
