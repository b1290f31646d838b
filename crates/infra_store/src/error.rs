//! Store error types

use thiserror::Error;

use domain_claims::ClaimStatus;

/// Errors that can occur at the claim store
#[derive(Debug, Error)]
pub enum StoreError {
    /// A claim with this transaction reference already exists
    #[error("duplicate transaction reference: {transaction_ref}")]
    Duplicate { transaction_ref: String },

    /// No claim with the given identifier
    #[error("claim not found: {0}")]
    NotFound(String),

    /// The claim was already decided by another moderator
    #[error("claim already decided: status is {status}")]
    AlreadyDecided { status: ClaimStatus },

    /// Failed to reach the storage backend
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A stored value could not be mapped back to a domain type
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

impl StoreError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        StoreError::NotFound(id.to_string())
    }

    /// Whether retrying later could help (connection-level trouble)
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Maps SQLx errors to store errors by PostgreSQL error code
///
/// 23505 (unique_violation) is the transaction-reference constraint; it is
/// the expected outcome of a duplicate submission, not a failure.
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => StoreError::NotFound("record not found".to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::Unavailable("connection pool exhausted".to_string())
            }
            sqlx::Error::Io(e) => StoreError::Unavailable(e.to_string()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate {
                    transaction_ref: db_err.message().to_string(),
                },
                _ => StoreError::QueryFailed(db_err.message().to_string()),
            },
            _ => StoreError::QueryFailed(error.to_string()),
        }
    }
}
