//! Contains the SQLite backed stores and a convenience function for creating
//! them from a connection.

pub mod transaction;

pub use transaction::SQLiteTransactionStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// Creates a [SQLiteTransactionStore] from `db_connection`.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_transaction_store(db_connection: Connection) -> Result<SQLiteTransactionStore, Error> {
    initialize(&db_connection)?;

    Ok(SQLiteTransactionStore::new(Arc::new(Mutex::new(
        db_connection,
    ))))
}
