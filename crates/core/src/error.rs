//! # Error Module
//!
//! Định nghĩa các domain errors cho Discobase sử dụng thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// Các lỗi nghiệp vụ cốt lõi, không liên quan đến infrastructure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    // === Transaction errors ===
    #[error("Not a valid credit trx type: {0}")]
    InvalidTrxKind(String),

    #[error("Invalid credit cost: {0} (allowed: 0, 1)")]
    InvalidCreditCost(i64),

    #[error("Balance overflow: {prior} + {delta}")]
    BalanceOverflow { prior: i64, delta: i64 },

    #[error("Balance mismatch at trx {id}: stored {stored}, expected {expected}")]
    BalanceMismatch { id: i64, stored: i64, expected: i64 },

    // === Catalog entry errors ===
    #[error("Rating value not between 0 and 5: {0}")]
    InvalidRating(i64),

    #[error("Invalid year: {0}")]
    InvalidYear(i64),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Entry has no artists: {0}")]
    MissingArtists(String),

    // === Validation errors ===
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Kiểm tra có phải lỗi validation của catalog entry không
    pub fn is_entry_validation(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidCreditCost(_)
                | CoreError::InvalidRating(_)
                | CoreError::InvalidYear(_)
                | CoreError::InvalidPrice(_)
                | CoreError::MissingArtists(_)
                | CoreError::ValidationError(_)
        )
    }

    /// Kiểm tra có phải lỗi tính toán balance không
    pub fn is_balance_error(&self) -> bool {
        matches!(
            self,
            CoreError::BalanceOverflow { .. } | CoreError::BalanceMismatch { .. }
        )
    }
}
