//! # branchbooks
//!
//! Bookkeeping core for a multi-branch organization: chart of accounts,
//! journal transactions with a review workflow, branches, users and
//! interface languages.
//!
//! ## Design Principles
//!
//! - **All-or-nothing imports**: a CSV batch with any invalid field is not merged
//! - **Exact amounts**: monetary values use `rust_decimal`
//! - **Closed vocabularies**: every enumerated column is a Rust enum
//! - **Owned state**: each record kind lives in its own [`Store`]
//!
//! ## Example
//!
//! ```no_run
//! use branchbooks::Ledger;
//!
//! let csv = "Active;AccountFlow;AccountType;AccountSubtype;TransactionCategory;CostCenter;InternalMovement\n\
//!            TRUE;Income;Revenues;Donation;Diezmo Regular;Local;FALSE\n";
//! let mut ledger = Ledger::seeded();
//! let report = ledger.import_accounts(csv, "FirstDev").unwrap();
//! assert_eq!(report.imported, vec![2]);
//! ledger.write_accounts(std::io::stdout()).unwrap();
//! ```

pub mod account;
pub mod amount;
pub mod analysis;
pub mod branch;
pub mod config;
pub mod date;
pub mod error;
pub mod import;
pub mod language;
pub mod ledger;
pub mod navigation;
pub mod parser;
pub mod schema;
pub mod session;
pub mod store;
pub mod transaction;
pub mod user;
pub mod vocab;

pub use account::{Account, AccountDraft, AccountPatch};
pub use amount::Amount;
pub use analysis::{MonthlyTotals, Summary};
pub use branch::{Branch, BranchPatch};
pub use config::Config;
pub use date::RecordDate;
pub use error::{LedgerError, Result};
pub use import::{DuplicateRecord, ImportReport};
pub use language::{Language, LanguageDraft, LanguagePatch};
pub use ledger::{Decision, Ledger};
pub use schema::ValidationError;
pub use session::{Session, SessionStore};
pub use store::{Audit, RecordId, Store};
pub use transaction::{Transaction, TransactionDraft, TransactionPatch, TransactionStatus};
pub use user::{User, UserLevel, UserPatch};
