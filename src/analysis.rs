//! Income and expense summaries over the journal.

use crate::amount::Amount;
use crate::transaction::Transaction;
use crate::vocab::TransactionType;
use serde::Serialize;

/// Label used for transactions whose date is not a real calendar day.
pub const INVALID_MONTH: &str = "Invalid Date";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    /// Month and year, e.g. `Mar 2024`.
    pub label: String,
    pub income: Amount,
    pub expenses: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_income: Amount,
    pub total_expenses: Amount,
    pub net: Amount,
    /// One entry per month, in the order months first appear.
    pub months: Vec<MonthlyTotals>,
}

fn month_label(tx: &Transaction) -> String {
    match tx.date.to_naive() {
        Some(date) => date.format("%b %Y").to_string(),
        None => INVALID_MONTH.to_string(),
    }
}

/// Totals and monthly breakdown of `transactions`, regardless of status.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = Summary::default();

    for tx in transactions {
        let label = month_label(tx);
        let idx = match summary.months.iter().position(|m| m.label == label) {
            Some(i) => i,
            None => {
                summary.months.push(MonthlyTotals {
                    label,
                    income: Amount::ZERO,
                    expenses: Amount::ZERO,
                });
                summary.months.len() - 1
            }
        };
        let month = &mut summary.months[idx];

        match tx.transaction_type {
            TransactionType::Income => {
                summary.total_income += tx.amount;
                month.income += tx.amount;
            }
            TransactionType::Expense => {
                summary.total_expenses += tx.amount;
                month.expenses += tx.amount;
            }
        }
    }

    summary.net = summary.total_income - summary.total_expenses;
    summary
}
