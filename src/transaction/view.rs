//! View models for the rows of the transaction list.

use serde::Serialize;

use crate::{
    database_id::TransactionId,
    transaction::{Transaction, TransactionType},
};

/// A transaction as displayed in the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRow {
    /// Used to open the edit screen for the row.
    pub id: TransactionId,
    /// The transaction label.
    pub label: String,
    /// The signed, formatted amount, e.g. "- $4.50".
    pub amount: String,
    /// Expenses are styled differently from income.
    pub is_expense: bool,
}

impl TransactionRow {
    /// Create the row for `transaction`.
    pub fn new_from_transaction(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id,
            label: transaction.label.to_string(),
            amount: format_row_amount(transaction),
            is_expense: transaction.transaction_type == TransactionType::Expense,
        }
    }
}

/// Format the amount of a list row.
///
/// Expenses are shown as "- $4.50", income as "+ $4.50".
pub fn format_row_amount(transaction: &Transaction) -> String {
    let sign = match transaction.transaction_type {
        TransactionType::Expense => '-',
        TransactionType::Income => '+',
    };

    format!("{sign} ${:.2}", transaction.amount.abs())
}
