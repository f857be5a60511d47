//! Opening the app's SQLite database and creating its schema.

use std::path::Path;

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, transaction::create_transaction_table};

/// The file name used for the database when no path is given.
pub const DEFAULT_DB_FILE_NAME: &str = "transactions.db";

/// The only schema version this app knows how to read and write.
pub const SCHEMA_VERSION: i64 = 1;

/// Open the database at `path` and initialize it, creating the file if needed.
///
/// # Errors
/// Returns an error if the file cannot be opened or [initialize] fails.
pub fn open(path: impl AsRef<Path>) -> Result<Connection, Error> {
    let connection = Connection::open(path)?;
    initialize(&connection)?;

    Ok(connection)
}

/// Open an initialized database that only lives in memory.
///
/// # Errors
/// Returns an error if [initialize] fails.
pub fn open_in_memory() -> Result<Connection, Error> {
    let connection = Connection::open_in_memory()?;
    initialize(&connection)?;

    Ok(connection)
}

/// Create the tables for the domain models and stamp the schema version.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an [Error::UnsupportedSchemaVersion] if the database was created
/// with a different schema version, or an [Error::SqlError] if there is an
/// SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    let version: i64 = transaction.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version != 0 && version != SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion(version));
    }

    create_transaction_table(&transaction)?;
    transaction.pragma_update(None, "user_version", SCHEMA_VERSION)?;

    transaction.commit()?;

    tracing::debug!("Initialized database with schema version {SCHEMA_VERSION}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::{SCHEMA_VERSION, initialize},
    };

    #[test]
    fn initialize_sets_schema_version() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn initialize_twice_succeeds() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        assert_eq!(initialize(&conn), Ok(()));
    }

    #[test]
    fn initialize_rejects_other_schema_versions() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", 2).unwrap();

        assert_eq!(initialize(&conn), Err(Error::UnsupportedSchemaVersion(2)));
    }
}
