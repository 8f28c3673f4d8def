//! Chart of accounts.
//!
//! An account is identified by a synthetic id, but its category is unique
//! in practice: imports treat an existing category as a duplicate.

use crate::import::{ImportContext, Importable, RowReader};
use crate::schema::{ColumnSpec, Rule, Schema, ValidationError};
use crate::store::{Audit, Patch, Record, RecordId};
use crate::vocab::{
    AccountFlow, AccountSubType, AccountType, CostCenter, TransactionCategory, Vocabulary,
};
use serde::{Deserialize, Serialize};

static COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("Active", Rule::Boolean),
    ColumnSpec::new("AccountFlow", Rule::OneOf(AccountFlow::contains)),
    ColumnSpec::new("AccountType", Rule::OneOf(AccountType::contains)),
    ColumnSpec::named("AccountSubtype", "AccountSubType", Rule::OneOf(AccountSubType::contains)),
    ColumnSpec::new("TransactionCategory", Rule::OneOf(TransactionCategory::contains)),
    ColumnSpec::new("CostCenter", Rule::OneOf(CostCenter::contains)),
    ColumnSpec::new("InternalMovement", Rule::Boolean),
];

/// Import format for accounts.
pub static ACCOUNT_SCHEMA: Schema = Schema::new(COLUMNS);

/// An entry in the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: RecordId,
    pub flow: AccountFlow,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub sub_type: AccountSubType,
    pub category: TransactionCategory,
    pub cost_center: CostCenter,
    pub internal_movement: bool,
    pub active: bool,
    #[serde(flatten)]
    pub audit: Audit,
    /// Never set by this crate; deletes remove the record outright.
    #[serde(default)]
    pub is_deleted: bool,
}

/// Fields submitted when creating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDraft {
    pub flow: AccountFlow,
    pub account_type: AccountType,
    pub sub_type: AccountSubType,
    pub category: TransactionCategory,
    pub cost_center: CostCenter,
    pub internal_movement: bool,
    pub active: bool,
}

impl Account {
    pub fn from_draft(id: RecordId, draft: AccountDraft, audit: Audit) -> Self {
        Account {
            id,
            flow: draft.flow,
            account_type: draft.account_type,
            sub_type: draft.sub_type,
            category: draft.category,
            cost_center: draft.cost_center,
            internal_movement: draft.internal_movement,
            active: draft.active,
            audit,
            is_deleted: false,
        }
    }

    /// The account as an import row, in column order.
    pub fn to_row(&self) -> [String; 7] {
        [
            flag_literal(self.active).to_string(),
            self.flow.to_string(),
            self.account_type.to_string(),
            self.sub_type.to_string(),
            self.category.to_string(),
            self.cost_center.to_string(),
            flag_literal(self.internal_movement).to_string(),
        ]
    }
}

pub(crate) fn flag_literal(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Partial account update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPatch {
    pub flow: Option<AccountFlow>,
    pub account_type: Option<AccountType>,
    pub sub_type: Option<AccountSubType>,
    pub category: Option<TransactionCategory>,
    pub cost_center: Option<CostCenter>,
    pub internal_movement: Option<bool>,
    pub active: Option<bool>,
}

impl Patch<Account> for AccountPatch {
    fn apply(self, target: &mut Account) {
        if let Some(v) = self.flow {
            target.flow = v;
        }
        if let Some(v) = self.account_type {
            target.account_type = v;
        }
        if let Some(v) = self.sub_type {
            target.sub_type = v;
        }
        if let Some(v) = self.category {
            target.category = v;
        }
        if let Some(v) = self.cost_center {
            target.cost_center = v;
        }
        if let Some(v) = self.internal_movement {
            target.internal_movement = v;
        }
        if let Some(v) = self.active {
            target.active = v;
        }
    }
}

impl Record for Account {
    type Key = RecordId;
    const KIND: &'static str = "Account";

    fn key(&self) -> RecordId {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl Importable for Account {
    type NaturalKey = String;

    fn schema() -> &'static Schema {
        &ACCOUNT_SCHEMA
    }

    fn natural_key(&self) -> String {
        self.category.to_string()
    }

    fn row_key(row: &RowReader<'_>) -> String {
        row.text("TransactionCategory").to_string()
    }

    fn from_row(
        id: RecordId,
        row: &RowReader<'_>,
        ctx: &ImportContext,
    ) -> Result<Self, ValidationError> {
        Ok(Account {
            id,
            flow: row.member("AccountFlow")?,
            account_type: row.member("AccountType")?,
            sub_type: row.member("AccountSubtype")?,
            category: row.member("TransactionCategory")?,
            cost_center: row.member("CostCenter")?,
            internal_movement: row.flag("InternalMovement")?,
            active: row.flag("Active")?,
            audit: Audit::created(&ctx.actor, ctx.at),
            is_deleted: false,
        })
    }
}
