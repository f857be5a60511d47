//! Contains traits and implementations for objects that store [transactions](crate::transaction).

mod background;
mod transaction;

pub mod sqlite;

pub use background::BackgroundStore;
pub use sqlite::SQLiteTransactionStore;
pub use transaction::TransactionStore;
