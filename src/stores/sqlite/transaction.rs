//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    database_id::TransactionId,
    stores::TransactionStore,
    transaction::{
        Transaction, TransactionBuilder, TransactionFilter, create_transaction,
        delete_transaction, get_transaction, query_transactions, update_transaction,
    },
};

/// Stores transactions in a SQLite database.
///
/// The connection is shared behind a mutex and each operation holds the lock
/// for exactly one statement, which serializes writes and keeps every read
/// consistent.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The connection should already be initialized with [crate::db::initialize].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire the database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the amount is negative or not finite,
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn insert(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = self.lock()?;
        let transaction = create_transaction(builder, &connection)?;
        tracing::info!("Created transaction {}", transaction.id);

        Ok(transaction)
    }

    /// Update a transaction in the database, a missing ID is ignored.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the amount is negative or not finite,
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&self, transaction: &Transaction) -> Result<(), Error> {
        let connection = self.lock()?;

        match update_transaction(transaction, &connection)? {
            0 => tracing::debug!(
                "Ignored update of transaction {} because it is not in the database",
                transaction.id
            ),
            _ => tracing::info!("Updated transaction {}", transaction.id),
        }

        Ok(())
    }

    /// Delete a transaction from the database, a missing ID is ignored.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let connection = self.lock()?;

        match delete_transaction(id, &connection)? {
            0 => tracing::debug!(
                "Ignored deletion of transaction {id} because it is not in the database"
            ),
            _ => tracing::info!("Deleted transaction {id}"),
        }

        Ok(())
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let connection = self.lock()?;
        get_transaction(id, &connection)
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_query(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;
        let transactions = query_transactions(filter, &connection)?;
        tracing::debug!(
            "Fetched {} transactions with filter {filter:?}",
            transactions.len()
        );

        Ok(transactions)
    }
}
