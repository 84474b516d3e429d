//! Error types for the customer payments service.

use crate::domain::Currency;

/// Domain-level errors (business rule violations on construction).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Phone number {0} is not valid")]
    InvalidPhoneNumber(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A uniqueness constraint rejected the write.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,
}

/// Card gateway errors (transport or provider failures).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Card gateway unreachable: {0}")]
    Transport(String),

    #[error("Card gateway rejected the request: {0}")]
    Provider(String),
}

/// Application-level errors returned by the services.
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Currency {0} is not supported")]
    UnsupportedCurrency(Currency),

    #[error("The card was not successfully debited")]
    ChargeDeclined,

    #[error(transparent)]
    DuplicateKey(RepoError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The card was debited but the payment could not be stored.
    #[error("Card was charged but payment was not recorded: {0}")]
    PaymentNotRecorded(RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            e @ RepoError::DuplicateKey(_) => AppError::DuplicateKey(e),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_phone_maps_to_validation() {
        let err: AppError = DomainError::InvalidPhoneNumber("+447".into()).into();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("+447")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_key_is_propagated_unchanged() {
        let err: AppError = RepoError::DuplicateKey("customers.phone_number".into()).into();
        assert!(matches!(err, AppError::DuplicateKey(RepoError::DuplicateKey(_))));
    }

    #[test]
    fn test_database_error_maps_to_internal() {
        let err: AppError = RepoError::Database("disk full".into()).into();
        assert!(matches!(err, AppError::Internal(msg) if msg == "disk full"));
    }
}
