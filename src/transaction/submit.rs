//! Saving the add and edit forms.

use crate::{
    Error,
    alert::Alert,
    database_id::TransactionId,
    stores::{BackgroundStore, TransactionStore},
    transaction::{FormError, Transaction, TransactionForm},
};

/// Why submitting a form did not save anything.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// The form was invalid, the store was not called.
    #[error(transparent)]
    Invalid(#[from] FormError),
    /// The store failed.
    #[error(transparent)]
    Store(#[from] Error),
}

impl SubmitError {
    /// The transient notice to show, if the error is not shown inline.
    pub fn alert(&self) -> Option<Alert> {
        match self {
            SubmitError::Invalid(error) => error.alert(),
            SubmitError::Store(error) => Some(error.alert()),
        }
    }
}

/// Validate the add screen and create the transaction.
///
/// # Errors
/// Returns a [SubmitError::Invalid] without touching the store if the form is
/// invalid, or a [SubmitError::Store] if the insert failed.
pub async fn submit_new<S>(
    form: &TransactionForm,
    store: &BackgroundStore<S>,
) -> Result<Transaction, SubmitError>
where
    S: TransactionStore,
{
    let builder = form.validate_new()?;

    Ok(store.insert(builder).await?)
}

/// Validate the edit screen and update the transaction with `id`.
///
/// An `id` that no longer exists is silently ignored by the store.
///
/// # Errors
/// Returns a [SubmitError::Invalid] without touching the store if the form is
/// invalid, or a [SubmitError::Store] if the update failed.
pub async fn submit_edit<S>(
    id: TransactionId,
    form: &TransactionForm,
    store: &BackgroundStore<S>,
) -> Result<Transaction, SubmitError>
where
    S: TransactionStore,
{
    let transaction = form.validate_update(id)?;
    store.update(transaction.clone()).await?;

    Ok(transaction)
}
