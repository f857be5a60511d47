//! Totals for the dashboard.
//!
//! Pure functions over a slice of transactions, kept apart from the warning
//! shown for a negative balance so that both can be tested on their own.

use serde::Serialize;

use crate::transaction::{Transaction, TransactionType};

/// The income, expense and balance of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Dashboard {
    /// Income minus expenses.
    pub balance: f64,
    /// The sum of the income amounts.
    pub income: f64,
    /// The sum of the expense amounts.
    pub expense: f64,
}

impl Dashboard {
    /// Sum the transactions by type.
    ///
    /// # Returns
    /// The totals, where `balance` is `income - expense`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let expense = sum_of_type(transactions, TransactionType::Expense);
        let income = sum_of_type(transactions, TransactionType::Income);

        Self {
            balance: income - expense,
            income,
            expense,
        }
    }

    /// Whether more money was spent than earned.
    pub fn is_balance_negative(&self) -> bool {
        self.balance < 0.0
    }
}

fn sum_of_type(transactions: &[Transaction], transaction_type: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == transaction_type)
        // Folding from 0.0 avoids the -0.0 an empty float `sum` produces.
        .fold(0.0, |total, transaction| total + transaction.amount)
}
