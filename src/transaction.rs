//! Journal transactions and their review workflow.
//!
//! A transaction starts as a `Draft`. Only drafts may be edited or deleted;
//! once submitted it moves to `Pending`, and a reviewer approves or rejects
//! it.

use crate::amount::Amount;
use crate::date::RecordDate;
use crate::error::{LedgerError, Result};
use crate::import::{ImportContext, Importable, RowReader};
use crate::schema::{ColumnSpec, Reference, Rule, Schema, ValidationError};
use crate::store::{Audit, Patch, Record, RecordId};
use crate::vocab::{
    vocabulary, TransactionCurrency, TransactionMethod, TransactionType, Vocabulary,
};
use serde::{Deserialize, Serialize};
use std::fmt;

vocabulary! {
    /// Review state of a transaction.
    pub enum TransactionStatus {
        Draft => "Draft",
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

static COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("TransactionDate", Rule::Date),
    ColumnSpec::new("TransactionTime", Rule::Time),
    ColumnSpec::new("TransactionType", Rule::OneOf(TransactionType::contains)),
    ColumnSpec::new("BranchName", Rule::Text),
    ColumnSpec::new("AccountCategory", Rule::Known(Reference::AccountCategory)),
    ColumnSpec::new("TransactionDescription", Rule::Text),
    ColumnSpec::new("ExternalSource", Rule::Text),
    ColumnSpec::new("ExtraInfo", Rule::Text),
    ColumnSpec::new("Amount", Rule::Decimal),
    ColumnSpec::new("Currency", Rule::OneOf(TransactionCurrency::contains)),
    ColumnSpec::new("TransactionMethod", Rule::OneOf(TransactionMethod::contains)),
];

/// Import format for transactions.
pub static TRANSACTION_SCHEMA: Schema = Schema::new(COLUMNS);

/// A journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub date: RecordDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub description: String,
    pub amount: Amount,
    pub currency: TransactionCurrency,
    pub method: TransactionMethod,
    /// Category of the account the entry is booked on.
    pub account: String,
    pub branch: String,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver: Option<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Fields submitted through the transaction form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub transaction_type: TransactionType,
    pub date: RecordDate,
    pub time: Option<String>,
    pub description: String,
    pub amount: Amount,
    pub currency: TransactionCurrency,
    pub method: TransactionMethod,
    pub account: String,
    pub branch: String,
    pub notes: Option<String>,
    pub attachments: Vec<String>,
}

impl Transaction {
    /// A new draft transaction.
    pub fn from_draft(id: RecordId, draft: TransactionDraft, audit: Audit) -> Self {
        Transaction {
            id,
            transaction_type: draft.transaction_type,
            date: draft.date,
            time: draft.time,
            description: draft.description,
            amount: draft.amount,
            currency: draft.currency,
            method: draft.method,
            account: draft.account,
            branch: draft.branch,
            status: TransactionStatus::Draft,
            external_source: None,
            extra_info: None,
            attachments: draft.attachments,
            notes: draft.notes,
            approver: None,
            audit,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.status == TransactionStatus::Draft
    }

    /// Fails unless the transaction is still a draft.
    pub fn ensure_editable(&self) -> Result<()> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(LedgerError::TransactionLocked {
                id: self.id,
                status: self.status,
            })
        }
    }

    /// Moves the transaction to `to` if the review workflow allows it.
    ///
    /// Allowed moves: Draft to Pending, Pending to Approved or Rejected,
    /// Rejected back to Draft for rework.
    pub fn transition(&mut self, to: TransactionStatus) -> Result<()> {
        use TransactionStatus::*;
        let allowed = matches!(
            (self.status, to),
            (Draft, Pending) | (Pending, Approved) | (Pending, Rejected) | (Rejected, Draft)
        );
        if !allowed {
            return Err(LedgerError::InvalidTransition {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// The transaction as an import row, in column order.
    pub fn to_row(&self) -> [String; 11] {
        [
            self.date.to_display(),
            self.time.clone().unwrap_or_default(),
            self.transaction_type.to_string(),
            self.branch.clone(),
            self.account.clone(),
            self.description.clone(),
            self.external_source.clone().unwrap_or_default(),
            self.extra_info.clone().unwrap_or_default(),
            self.amount.to_localized(),
            self.currency.to_string(),
            self.method.to_string(),
        ]
    }
}

/// Partial transaction update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub transaction_type: Option<TransactionType>,
    pub date: Option<RecordDate>,
    pub time: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub currency: Option<TransactionCurrency>,
    pub method: Option<TransactionMethod>,
    pub account: Option<String>,
    pub branch: Option<String>,
    pub notes: Option<String>,
    pub attachments: Option<Vec<String>>,
}

impl Patch<Transaction> for TransactionPatch {
    fn apply(self, target: &mut Transaction) {
        if let Some(v) = self.transaction_type {
            target.transaction_type = v;
        }
        if let Some(v) = self.date {
            target.date = v;
        }
        if let Some(v) = self.time {
            target.time = Some(v);
        }
        if let Some(v) = self.description {
            target.description = v;
        }
        if let Some(v) = self.amount {
            target.amount = v;
        }
        if let Some(v) = self.currency {
            target.currency = v;
        }
        if let Some(v) = self.method {
            target.method = v;
        }
        if let Some(v) = self.account {
            target.account = v;
        }
        if let Some(v) = self.branch {
            target.branch = v;
        }
        if let Some(v) = self.notes {
            target.notes = Some(v);
        }
        if let Some(v) = self.attachments {
            target.attachments = v;
        }
    }
}

/// Natural key of a transaction: description and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionKey {
    pub description: String,
    /// `DD/MM/YYYY`, as written in import files.
    pub date: String,
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.date)
    }
}

impl Record for Transaction {
    type Key = RecordId;
    const KIND: &'static str = "Transaction";

    fn key(&self) -> RecordId {
        self.id
    }
}

impl Importable for Transaction {
    type NaturalKey = TransactionKey;

    fn schema() -> &'static Schema {
        &TRANSACTION_SCHEMA
    }

    fn natural_key(&self) -> TransactionKey {
        TransactionKey {
            description: self.description.clone(),
            date: self.date.to_display(),
        }
    }

    fn row_key(row: &RowReader<'_>) -> TransactionKey {
        TransactionKey {
            description: row.text("TransactionDescription").to_string(),
            date: row.text("TransactionDate").to_string(),
        }
    }

    fn from_row(
        id: RecordId,
        row: &RowReader<'_>,
        ctx: &ImportContext,
    ) -> std::result::Result<Self, ValidationError> {
        Ok(Transaction {
            id,
            transaction_type: row.member("TransactionType")?,
            date: row.date("TransactionDate")?,
            time: row.optional("TransactionTime"),
            description: row.text("TransactionDescription").to_string(),
            amount: row.amount("Amount")?,
            currency: row.member("Currency")?,
            method: row.member("TransactionMethod")?,
            account: row.text("AccountCategory").to_string(),
            branch: row.text("BranchName").to_string(),
            status: TransactionStatus::Draft,
            external_source: row.optional("ExternalSource"),
            extra_info: row.optional("ExtraInfo"),
            attachments: Vec::new(),
            notes: None,
            approver: None,
            audit: Audit::created(&ctx.actor, ctx.at),
        })
    }
}
