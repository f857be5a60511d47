//! Implements the state shared by the screens of the app.

use std::time::Duration;

use rusqlite::Connection;

use crate::{
    Error,
    list::ListController,
    stores::{BackgroundStore, SQLiteTransactionStore, sqlite::create_transaction_store},
};

/// Settings for the controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    /// How long a deletion can be undone after it was made.
    pub undo_timeout: Duration,
}

impl AppConfig {
    /// How long the deletion notice stays visible by default.
    pub const DEFAULT_UNDO_TIMEOUT: Duration = Duration::from_millis(2750);
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            undo_timeout: Self::DEFAULT_UNDO_TIMEOUT,
        }
    }
}

/// The state of the app: the store every screen talks to and the config.
///
/// Construct one when the app starts and hand it to each screen, there is
/// no global database handle.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The config used to build controllers.
    pub config: AppConfig,

    /// The transaction store shared by all screens.
    pub transaction_store: BackgroundStore<SQLiteTransactionStore>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, config: AppConfig) -> Result<Self, Error> {
        let transaction_store = create_transaction_store(db_connection)?;

        Ok(Self {
            config,
            transaction_store: BackgroundStore::new(transaction_store),
        })
    }

    /// Create a controller for a list or home screen.
    pub fn list_controller(&self) -> ListController<SQLiteTransactionStore> {
        ListController::new(self.transaction_store.clone(), &self.config)
    }
}
