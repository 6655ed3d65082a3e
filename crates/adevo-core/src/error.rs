use thiserror::Error;

/// Input rejected locally, before any external call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("BVN must be exactly 11 digits.")]
    InvalidBvn,

    #[error("Transaction ID / reference is required.")]
    MissingTransactionId,

    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,

    #[error("Transaction date is required.")]
    MissingTransactionDate,

    #[error("Please describe what happened.")]
    MissingDescription,
}
