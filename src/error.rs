//! Error types for ledger operations.
//!
//! Import validation problems and duplicate rows are reported as values in
//! an [`ImportReport`](crate::import::ImportReport), never through this type.

use crate::transaction::TransactionStatus;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while operating on the ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Session or configuration blob could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No record with the given key exists in the collection
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    /// A record with the same natural key already exists
    #[error("{kind} '{key}' already exists")]
    DuplicateKey { kind: &'static str, key: String },

    /// Only draft transactions may be edited or deleted
    #[error("Transaction {id} is {status} and can no longer be changed")]
    TransactionLocked { id: u64, status: TransactionStatus },

    /// Requested status change is not part of the review workflow
    #[error("Transaction {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: u64,
        from: TransactionStatus,
        to: TransactionStatus,
    },

    /// Username/password pair was not accepted
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The operation needs a logged-in user
    #[error("Not logged in. Run `branchbooks login <username> --password <password>` first")]
    NotAuthenticated,

    /// The user's level does not reach the page behind the command
    #[error("User level {level} cannot open {page}")]
    Forbidden { page: &'static str, level: u8 },

    /// A field cannot be written without breaking the `;`-separated line format
    #[error("Row {row}: {value:?} contains a delimiter or line break and cannot be exported")]
    Unexportable { row: usize, value: String },

    /// An import batch contained invalid rows and nothing was merged
    #[error("Import rejected: {errors} invalid field(s), no records were imported")]
    ImportRejected { errors: usize },
}
