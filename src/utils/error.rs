use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    /// Request violates a business rule (sold out, quantity cap,
    /// cancellation cutoff, already cancelled, bad referral input).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Caller does not own the resource.
    #[error("Forbidden: {0}")]
    ForbiddenAccess(String),

    /// Caller's role may never perform the action.
    #[error("Forbidden: {0}")]
    ForbiddenAction(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Persistence failure unrelated to business rules. Surfaced as a
    /// 502 with a scrubbed message; the underlying error is only logged.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// Stored data the engine cannot interpret (e.g. an unknown event
    /// type discriminator).
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// Broken internal invariant (e.g. a ledger debit that would go
    /// negative despite the caller's funds pre-check).
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenAccess(_) => StatusCode::FORBIDDEN,
            AppError::ForbiddenAction(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientFunds(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Database(_) => StatusCode::BAD_GATEWAY,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::ForbiddenAccess(_) => "FORBIDDEN_ACCESS",
            AppError::ForbiddenAction(_) => "FORBIDDEN_ACTION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            AppError::Database(_) => "BAD_GATEWAY",
            AppError::BadGateway(_) => "BAD_GATEWAY",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::InvalidInput(msg)
            | AppError::AuthError(msg)
            | AppError::ForbiddenAccess(msg)
            | AppError::ForbiddenAction(msg)
            | AppError::NotFound(msg)
            | AppError::InsufficientFunds(msg) => {
                error!(error = ?self, message = %msg, "Request rejected");
            }
            AppError::Internal(msg) => {
                error!(error = ?self, message = %msg, "Invariant violation");
            }
            AppError::BadGateway(msg) => {
                error!(error = ?self, message = %msg, "Corrupted data");
            }
            AppError::Database(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level messages to the client
        let public_message = match &self {
            AppError::InvalidInput(msg)
            | AppError::AuthError(msg)
            | AppError::ForbiddenAccess(msg)
            | AppError::ForbiddenAction(msg)
            | AppError::NotFound(msg)
            | AppError::InsufficientFunds(msg) => msg.clone(),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::BadGateway(msg) => msg.clone(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        };

        error_response(code, public_message, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(
            AppError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ForbiddenAccess("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::ForbiddenAction("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InsufficientFunds("x".into()).status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolClosed).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_database_details_are_scrubbed() {
        let err = AppError::Database(sqlx::Error::PoolClosed);
        assert_eq!(err.code(), "BAD_GATEWAY");
        // the thiserror display must not leak driver details either
        assert_eq!(err.to_string(), "Database error");
    }
}
