//! Ledger layer errors
//!
//! Wraps persistence and domain errors, plus catalog and hook failures.

use crate::config::ConfigError;
use discobase_persistence::PersistenceError;
use thiserror::Error;

/// Ledger and catalog operation errors
#[derive(Debug, Error)]
pub enum LedgerError {
    // === Catalog errors ===
    #[error("Entry not found: {0}")]
    EntryNotFound(i64),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    // === Hook errors ===
    #[error("Lifecycle handler {handler} failed: {reason}")]
    HandlerFailed { handler: String, reason: String },

    // === Wrapped errors ===
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Core error: {0}")]
    Core(#[from] discobase_core::CoreError),
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(PersistenceError::Database(err))
    }
}

impl LedgerError {
    /// Create handler failure error
    pub fn handler_failed(handler: &str, reason: impl ToString) -> Self {
        Self::HandlerFailed {
            handler: handler.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Map a record lookup failure, turning `NotFound` into `EntryNotFound`
    pub fn entry_lookup(id: i64) -> impl FnOnce(PersistenceError) -> Self {
        move |err| {
            if err.is_not_found() {
                Self::EntryNotFound(id)
            } else {
                Self::Persistence(err)
            }
        }
    }

    /// Check if the error is a validation failure of the entry itself
    pub fn is_validation(&self) -> bool {
        match self {
            Self::InvalidEntry(_) => true,
            Self::Core(core) => core.is_entry_validation(),
            Self::Persistence(PersistenceError::UniqueViolation(_)) => true,
            _ => false,
        }
    }
}
