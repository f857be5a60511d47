//! Fincti is a personal finance tracker.
//!
//! Users record income and expense transactions, list them with type and
//! category filters, watch their balance on a dashboard, delete entries with
//! the option to undo, and try the 52 week savings challenge.
//!
//! This library provides everything below the screens: the SQLite backed
//! transaction store, the dashboard totals, the list controller with
//! delete/undo, form validation and the challenge calculator.

#![warn(missing_docs)]

mod alert;
mod app_state;
pub mod challenge;
pub mod dashboard;
mod database_id;
pub mod db;
mod error;
pub mod list;
mod logging;
pub mod stores;
pub mod transaction;

pub use alert::{Alert, AlertKind};
pub use app_state::{AppConfig, AppState};
pub use database_id::TransactionId;
pub use error::Error;
pub use logging::setup_logging;
pub use transaction::{
    Category, Label, Transaction, TransactionBuilder, TransactionFilter, TransactionType,
};
