//! Defines the transaction store trait.

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Category, Transaction, TransactionBuilder, TransactionFilter, TransactionType},
};

/// Handles the creation, retrieval, update and deletion of transactions.
///
/// Every read returns a snapshot that reflects one consistent view of the
/// store. Implementers serialize concurrent calls themselves.
pub trait TransactionStore: Clone + Send + Sync + 'static {
    /// Create a new transaction in the store and assign it a fresh ID.
    ///
    /// IDs are never reused, even after the transaction is deleted.
    fn insert(&self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Replace every field of the transaction with the same ID.
    ///
    /// Implementers should silently ignore IDs that are not in the store.
    fn update(&self, transaction: &Transaction) -> Result<(), Error>;

    /// Remove the transaction with `id` from the store.
    ///
    /// Implementers should silently ignore IDs that are not in the store.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve the transactions matching `filter` in insertion order.
    fn get_query(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, Error>;

    /// Retrieve every transaction in insertion order.
    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionFilter::default())
    }

    /// Retrieve the transactions of `transaction_type`.
    fn get_all_by_type(&self, transaction_type: TransactionType) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionFilter {
            transaction_type: Some(transaction_type),
            category: None,
        })
    }

    /// Retrieve the transactions in `category`.
    fn get_all_by_category(&self, category: Category) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionFilter {
            transaction_type: None,
            category: Some(category),
        })
    }

    /// Retrieve the transactions of `transaction_type` in `category`.
    fn get_all_by_type_and_category(
        &self,
        transaction_type: TransactionType,
        category: Category,
    ) -> Result<Vec<Transaction>, Error> {
        self.get_query(TransactionFilter {
            transaction_type: Some(transaction_type),
            category: Some(category),
        })
    }

    /// Dispatch `filter` to the narrowest query: both axes, one axis, or
    /// everything.
    fn get_filtered(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, Error> {
        match (filter.transaction_type, filter.category) {
            (Some(transaction_type), Some(category)) => {
                self.get_all_by_type_and_category(transaction_type, category)
            }
            (Some(transaction_type), None) => self.get_all_by_type(transaction_type),
            (None, Some(category)) => self.get_all_by_category(category),
            (None, None) => self.get_all(),
        }
    }
}
