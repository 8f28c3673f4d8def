//! The ledger: every record collection of one organization.
//!
//! All mutation goes through [`Ledger`], which stamps audit fields,
//! enforces the transaction review workflow and feeds the import pipeline
//! the reference data it needs.

use crate::account::{Account, AccountDraft, AccountPatch, ACCOUNT_SCHEMA};
use crate::amount::Amount;
use crate::analysis::{summarize, Summary};
use crate::branch::{Branch, BranchPatch};
use crate::config::Config;
use crate::date::RecordDate;
use crate::error::{LedgerError, Result};
use crate::import::{import_into, ImportContext, ImportReport};
use crate::language::{Language, LanguageDraft, LanguagePatch};
use crate::schema::{References, Schema};
use crate::session::bootstrap_user;
use crate::store::{Audit, Patch, RecordId, Store};
use crate::transaction::{
    Transaction, TransactionDraft, TransactionPatch, TransactionStatus, TRANSACTION_SCHEMA,
};
use crate::user::{User, UserPatch};
use crate::vocab::{
    AccountFlow, AccountSubType, AccountType, CostCenter, TransactionCategory,
    TransactionCurrency, TransactionMethod, TransactionType,
};
use chrono::{TimeZone, Utc};
use csv::{QuoteStyle, WriterBuilder};
use log::{debug, info};
use rust_decimal::Decimal;
use std::io::Write;

/// Outcome of reviewing a pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn status(self) -> TransactionStatus {
        match self {
            Decision::Approve => TransactionStatus::Approved,
            Decision::Reject => TransactionStatus::Rejected,
        }
    }
}

/// In-memory books of one organization.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: Store<Account>,
    transactions: Store<Transaction>,
    branches: Store<Branch>,
    languages: Store<Language>,
    users: Store<User>,
    detect_transaction_duplicates: bool,
}

const SEED_ACTOR: &str = "FirstDev";

impl Ledger {
    /// Creates a ledger with no records at all.
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Creates a ledger holding the starting data of a fresh installation.
    pub fn seeded() -> Self {
        let mut ledger = Ledger::new();
        ledger.seed();
        ledger
    }

    /// A seeded ledger using the behaviour switches in `config`.
    pub fn from_config(config: &Config) -> Self {
        let mut ledger = Ledger::seeded();
        ledger.detect_transaction_duplicates = config.detect_transaction_duplicates;
        ledger
    }

    pub fn set_detect_transaction_duplicates(&mut self, enabled: bool) {
        self.detect_transaction_duplicates = enabled;
    }

    fn seed(&mut self) {
        let seeded_at = |d, h, m| Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).single();
        let audit = |d, h, m| Audit {
            created_at: seeded_at(d, h, m),
            created_by: Some(SEED_ACTOR.to_string()),
            ..Audit::default()
        };

        self.accounts.create_with(|id| {
            Account::from_draft(
                id,
                AccountDraft {
                    flow: AccountFlow::Income,
                    account_type: AccountType::Revenues,
                    sub_type: AccountSubType::Donation,
                    category: TransactionCategory::OfrendaServicioRegular,
                    cost_center: CostCenter::Any,
                    internal_movement: false,
                    active: true,
                },
                audit(1, 9, 0),
            )
        });

        let branch = Branch {
            company: "MMM".into(),
            world_region: "Europe Block C".into(),
            region_sector: "Presbitery 1".into(),
            country: "Luxembourg".into(),
            zone: "Luxembourg".into(),
            province: "Luxembourg".into(),
            city: "Luxembourg".into(),
            name: "Lux Central".into(),
            approver: SEED_ACTOR.into(),
            audit: audit(1, 9, 0),
            is_deleted: false,
        };
        let mut dev = bootstrap_user(SEED_ACTOR);
        dev.audit = audit(1, 9, 0);

        // Safety: the stores are empty, so no key can collide
        self.branches.insert(branch).expect("empty branch store");
        self.users.insert(dev).expect("empty user store");

        for (code, name, is_default) in [
            ("en", "English", true),
            ("es", "Spanish", false),
            ("fr", "French", false),
        ] {
            self.languages.create_language(
                LanguageDraft {
                    code: code.into(),
                    name: name.into(),
                    is_default,
                    enabled: true,
                },
                audit(1, 9, 0),
            );
        }

        let samples = [
            (
                TransactionType::Income,
                RecordDate::new(2024, 3, 1),
                "Monthly Donation",
                Amount::new(Decimal::from(1000)),
                "Regular Donations",
                TransactionStatus::Approved,
                audit(1, 10, 0),
            ),
            (
                TransactionType::Expense,
                RecordDate::new(2024, 3, 2),
                "Office Supplies",
                Amount::new(Decimal::from(250)),
                "Office Equipment",
                TransactionStatus::Pending,
                audit(2, 14, 30),
            ),
        ];
        for (kind, date, description, amount, account, status, audit) in samples {
            self.transactions.create_with(|id| {
                let mut tx = Transaction::from_draft(
                    id,
                    TransactionDraft {
                        transaction_type: kind,
                        date,
                        time: None,
                        description: description.into(),
                        amount,
                        currency: TransactionCurrency::Eur,
                        method: TransactionMethod::Bank,
                        account: account.into(),
                        branch: "Lux Central".into(),
                        notes: None,
                        attachments: Vec::new(),
                    },
                    audit,
                );
                tx.status = status;
                tx
            });
        }
    }

    pub fn accounts(&self) -> &Store<Account> {
        &self.accounts
    }

    pub fn transactions(&self) -> &Store<Transaction> {
        &self.transactions
    }

    pub fn branches(&self) -> &Store<Branch> {
        &self.branches
    }

    pub fn languages(&self) -> &Store<Language> {
        &self.languages
    }

    pub fn users(&self) -> &Store<User> {
        &self.users
    }

    fn references(&self) -> References {
        References::with_account_categories(self.accounts.list().map(|a| a.category.to_string()))
    }

    /// Imports a chart-of-accounts file.
    pub fn import_accounts(&mut self, text: &str, actor: &str) -> Result<ImportReport> {
        let ctx = ImportContext::now(actor);
        import_into(&mut self.accounts, text, &References::none(), true, &ctx)
    }

    /// Imports a journal file. Account categories are checked against the
    /// current chart of accounts.
    pub fn import_transactions(&mut self, text: &str, actor: &str) -> Result<ImportReport> {
        let refs = self.references();
        let ctx = ImportContext::now(actor);
        import_into(
            &mut self.transactions,
            text,
            &refs,
            self.detect_transaction_duplicates,
            &ctx,
        )
    }

    pub fn create_account(&mut self, draft: AccountDraft, actor: &str) -> RecordId {
        let audit = Audit::created(actor, Utc::now());
        self.accounts
            .create_with(|id| Account::from_draft(id, draft, audit))
            .id
    }

    pub fn update_account(
        &mut self,
        id: RecordId,
        patch: AccountPatch,
        actor: &str,
    ) -> Result<&Account> {
        self.accounts.update(&id, |account| {
            patch.apply(account);
            account.audit.touch(actor, Utc::now());
            Ok(())
        })
    }

    pub fn delete_account(&mut self, id: RecordId) -> Result<Account> {
        self.accounts.delete(&id)
    }

    /// Adds a branch; its name must not be taken.
    pub fn create_branch(&mut self, mut branch: Branch, actor: &str) -> Result<&Branch> {
        branch.audit = Audit::created(actor, Utc::now());
        self.branches.insert(branch)
    }

    pub fn update_branch(&mut self, name: &str, patch: BranchPatch, actor: &str) -> Result<&Branch> {
        self.branches.update(&name.to_string(), |branch| {
            patch.apply(branch);
            branch.audit.touch(actor, Utc::now());
            Ok(())
        })
    }

    pub fn delete_branch(&mut self, name: &str) -> Result<Branch> {
        self.branches.delete(&name.to_string())
    }

    /// Adds a user; the username must not be taken.
    pub fn create_user(&mut self, mut user: User, actor: &str) -> Result<&User> {
        user.audit = Audit::created(actor, Utc::now());
        self.users.insert(user)
    }

    pub fn update_user(&mut self, username: &str, patch: UserPatch, actor: &str) -> Result<&User> {
        self.users.update(&username.to_string(), |user| {
            patch.apply(user);
            user.audit.touch(actor, Utc::now());
            Ok(())
        })
    }

    pub fn delete_user(&mut self, username: &str) -> Result<User> {
        self.users.delete(&username.to_string())
    }

    pub fn create_language(&mut self, draft: LanguageDraft, actor: &str) -> RecordId {
        self.languages
            .create_language(draft, Audit::created(actor, Utc::now()))
    }

    pub fn update_language(
        &mut self,
        id: RecordId,
        patch: LanguagePatch,
        actor: &str,
    ) -> Result<&Language> {
        self.languages.update_language(id, patch, actor, Utc::now())
    }

    pub fn set_default_language(&mut self, id: RecordId) -> Result<()> {
        self.languages.set_default(id)
    }

    pub fn delete_language(&mut self, id: RecordId) -> Result<Language> {
        self.languages.delete(&id)
    }

    /// Records a transaction entered by hand. It starts as a draft.
    pub fn record_transaction(&mut self, draft: TransactionDraft, actor: &str) -> RecordId {
        let audit = Audit::created(actor, Utc::now());
        let id = self
            .transactions
            .create_with(|id| Transaction::from_draft(id, draft, audit))
            .id;
        info!("Transaction {} recorded by '{}'", id, actor);
        id
    }

    /// Edits a draft transaction.
    pub fn update_transaction(
        &mut self,
        id: RecordId,
        patch: TransactionPatch,
        actor: &str,
    ) -> Result<&Transaction> {
        self.transactions.update(&id, |tx| {
            tx.ensure_editable()?;
            patch.apply(tx);
            tx.audit.touch(actor, Utc::now());
            Ok(())
        })
    }

    /// Deletes a draft transaction.
    pub fn delete_transaction(&mut self, id: RecordId) -> Result<Transaction> {
        if let Some(tx) = self.transactions.get(&id) {
            tx.ensure_editable()?;
        }
        self.transactions.delete(&id)
    }

    /// Sends a draft for review.
    pub fn submit_transaction(&mut self, id: RecordId, actor: &str) -> Result<&Transaction> {
        self.move_transaction(id, TransactionStatus::Pending, actor)
    }

    /// Approves or rejects a pending transaction on behalf of `reviewer`.
    pub fn review_transaction(
        &mut self,
        id: RecordId,
        decision: Decision,
        reviewer: &str,
    ) -> Result<&Transaction> {
        let tx = self.transactions.update(&id, |tx| {
            tx.transition(decision.status())?;
            tx.approver = Some(reviewer.to_string());
            tx.audit.touch(reviewer, Utc::now());
            Ok(())
        })?;
        info!("Transaction {} {} by '{}'", id, tx.status, reviewer);
        Ok(tx)
    }

    /// Returns a rejected transaction to draft for rework.
    pub fn reopen_transaction(&mut self, id: RecordId, actor: &str) -> Result<&Transaction> {
        self.move_transaction(id, TransactionStatus::Draft, actor)
    }

    fn move_transaction(
        &mut self,
        id: RecordId,
        to: TransactionStatus,
        actor: &str,
    ) -> Result<&Transaction> {
        let tx = self.transactions.update(&id, |tx| {
            tx.transition(to)?;
            tx.audit.touch(actor, Utc::now());
            Ok(())
        })?;
        debug!("Transaction {} is now {}", id, to);
        Ok(tx)
    }

    /// Income, expenses and monthly totals over the whole journal.
    pub fn summary(&self) -> Summary {
        summarize(self.transactions.list())
    }

    /// Writes the chart of accounts in the import format.
    pub fn write_accounts<W: Write>(&self, writer: W) -> Result<()> {
        write_rows(writer, &ACCOUNT_SCHEMA, self.accounts.list().map(Account::to_row))
    }

    /// Writes the journal in the import format.
    pub fn write_transactions<W: Write>(&self, writer: W) -> Result<()> {
        write_rows(
            writer,
            &TRANSACTION_SCHEMA,
            self.transactions.list().map(Transaction::to_row),
        )
    }
}

fn write_rows<W, I, R>(writer: W, schema: &Schema, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    // The import parser has no quoting, so fields are written raw and any
    // field holding a delimiter or line break is refused.
    let mut csv_writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    csv_writer.write_record(schema.columns.iter().map(|c| c.header))?;
    for (index, row) in rows.into_iter().enumerate() {
        let fields: Vec<String> = row.into_iter().map(|f| f.as_ref().to_string()).collect();
        if let Some(field) = fields.iter().find(|f| f.contains([';', '\n', '\r'])) {
            return Err(LedgerError::Unexportable {
                row: index + 1,
                value: field.clone(),
            });
        }
        csv_writer.write_record(&fields)?;
    }

    csv_writer.flush()?;
    Ok(())
}
