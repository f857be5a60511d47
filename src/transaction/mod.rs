//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Form validation and saving for the add and edit screens
//! - View models for the transaction list

mod core;
mod form;
mod submit;
mod view;

pub use core::{
    Category, Label, Transaction, TransactionBuilder, TransactionFilter, TransactionType,
    create_transaction, delete_transaction, get_transaction, query_transactions,
    update_transaction,
};
pub use form::{FormError, FormField, TransactionForm, parse_amount};
pub use submit::{SubmitError, submit_edit, submit_new};
pub use view::{TransactionRow, format_row_amount};

pub(crate) use core::create_transaction_table;

#[cfg(test)]
pub use core::count_transactions;
