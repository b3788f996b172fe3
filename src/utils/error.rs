use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::settlement::PurchaseError;
use crate::store::StoreError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalServiceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalServiceError(msg)
            | AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(e) => AppError::DatabaseError(e),
            StoreError::RowNotFound(what) => {
                AppError::InternalServerError(format!("Missing {} row", what))
            }
        }
    }
}

impl From<PurchaseError> for AppError {
    fn from(e: PurchaseError) -> Self {
        let message = e.to_string();
        match e {
            PurchaseError::NotAuthenticated => AppError::AuthError(message),
            PurchaseError::NotFound | PurchaseError::ProfileNotFound => {
                AppError::NotFound(message)
            }
            PurchaseError::SelfPurchaseForbidden => AppError::Forbidden(message),
            PurchaseError::NotActive
            | PurchaseError::Conflict => AppError::Conflict(message),
            PurchaseError::InsufficientInventory
            | PurchaseError::InsufficientBalance => AppError::ValidationError(message),
            PurchaseError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level message to the client
        let public_message = match &self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalServiceError(msg)
            | AppError::InternalServerError(msg) => msg.clone(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
        };

        // Do not expose internal details in the API response
        let details = None;

        error_response(code, public_message, details, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_errors_map_to_expected_statuses() {
        let cases = [
            (PurchaseError::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (PurchaseError::NotFound, StatusCode::NOT_FOUND),
            (PurchaseError::ProfileNotFound, StatusCode::NOT_FOUND),
            (PurchaseError::SelfPurchaseForbidden, StatusCode::FORBIDDEN),
            (PurchaseError::NotActive, StatusCode::CONFLICT),
            (PurchaseError::InsufficientInventory, StatusCode::BAD_REQUEST),
            (PurchaseError::InsufficientBalance, StatusCode::BAD_REQUEST),
            (PurchaseError::Conflict, StatusCode::CONFLICT),
        ];

        for (err, expected) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status_code(), expected);
        }
    }

    #[test]
    fn purchase_error_messages_surface_to_the_user() {
        let app: AppError = PurchaseError::InsufficientBalance.into();
        match app {
            AppError::ValidationError(msg) => assert_eq!(msg, "Insufficient balance."),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }
}
