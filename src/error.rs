//! Defines the app level error type and its conversion to user-facing alerts.

use crate::alert::Alert;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string (or only whitespace) was used as a transaction label.
    #[error("Please enter a valid label")]
    EmptyLabel,

    /// The amount could not be parsed as a number, or it is not a finite,
    /// non-negative value.
    ///
    /// Callers should pass in the offending input.
    #[error("Please enter a valid amount")]
    InvalidAmount(String),

    /// A new transaction must have a photo attached.
    #[error("Please select a photo")]
    MissingPhoto,

    /// The code does not refer to a transaction type, i.e. is not "0" or "1".
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// The code does not refer to one of the fixed categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// The weekly increment for the savings challenge is missing, is not a
    /// whole number or is negative.
    #[error("Please enter a valid increment amount")]
    InvalidIncrement(String),

    /// The savings challenge total does not fit in a 64-bit integer.
    #[error("the increment {0} is too large to calculate a total for")]
    IncrementTooLarge(u64),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A store operation running on the blocking thread pool panicked or was
    /// cancelled before it returned.
    #[error("the background store task failed: {0}")]
    BackgroundTaskFailed(String),

    /// The database file was created with a schema this version of the app
    /// does not understand.
    #[error("unsupported database schema version {0}")]
    UnsupportedSchemaVersion(i64),

    /// Undo was requested but there is no deletion that can still be undone,
    /// e.g. the notice timed out or was dismissed.
    #[error("there is no deleted transaction to restore")]
    UndoUnavailable,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// Whether the error was caused by user input rather than the store.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyLabel
                | Error::InvalidAmount(_)
                | Error::MissingPhoto
                | Error::InvalidTransactionType(_)
                | Error::InvalidCategory(_)
                | Error::InvalidIncrement(_)
                | Error::IncrementTooLarge(_)
        )
    }

    /// Convert the error into an alert that can be shown to the user.
    ///
    /// Validation errors keep their message. Store faults are replaced with a
    /// generic message, the details should only be logged.
    pub fn alert(&self) -> Alert {
        match self {
            error if error.is_validation_error() => Alert::error_simple(&error.to_string()),
            Error::UndoUnavailable => Alert::error(
                "Could not undo",
                "The transaction can no longer be restored.",
            ),
            Error::NotFound => Alert::error(
                "Could not find transaction",
                "Try refreshing the list to see if the transaction has already been deleted.",
            ),
            Error::UnsupportedSchemaVersion(version) => Alert::error(
                "Unsupported database",
                &format!(
                    "The database uses schema version {version}, which this version of the app \
                    cannot open."
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred. Please try again.",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, alert::AlertKind};

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_alert_keeps_message() {
        let alert = Error::MissingPhoto.alert();

        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, "Please select a photo");
        assert!(alert.details.is_empty());
    }

    #[test]
    fn store_fault_alert_is_generic() {
        let alert = Error::DatabaseLockError.alert();

        assert_eq!(alert.message, "Something went wrong");
        assert_eq!(alert.details, "An unexpected error occurred. Please try again.");
    }
}
