//! Validation for the add and edit transaction forms.
//!
//! The screens collect raw text from their inputs. A [TransactionForm] turns
//! that text into a [TransactionBuilder] (new transactions) or a
//! [Transaction] (edits), reporting the first invalid field so the screen can
//! show the message next to it.

use crate::{
    Error,
    alert::Alert,
    database_id::TransactionId,
    transaction::{Category, Label, Transaction, TransactionBuilder, TransactionType},
};

/// The raw values entered into the add or edit transaction screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    /// Text of the label input.
    pub label: String,
    /// Text of the amount input.
    pub amount: String,
    /// Text of the description input.
    pub description: String,
    /// The selected type code, "0" (expense) or "1" (income).
    pub transaction_type: String,
    /// The selected category code, the index into [Category::ALL].
    pub category: String,
    /// The encoded image returned by the image picker.
    pub photo: Option<Vec<u8>>,
}

impl Default for TransactionForm {
    /// An empty form with the first type and category selected.
    fn default() -> Self {
        Self {
            label: String::new(),
            amount: String::new(),
            description: String::new(),
            transaction_type: TransactionType::Expense.code().to_owned(),
            category: Category::Food.code().to_owned(),
            photo: None,
        }
    }
}

/// The input a [FormError] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    #[allow(missing_docs)]
    Label,
    #[allow(missing_docs)]
    Amount,
    #[allow(missing_docs)]
    TransactionType,
    #[allow(missing_docs)]
    Category,
    #[allow(missing_docs)]
    Photo,
}

/// Why a form could not be submitted.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct FormError {
    /// The input that failed validation.
    pub field: FormField,
    /// What was wrong with it.
    pub error: Error,
}

impl FormError {
    fn new(field: FormField, error: Error) -> Self {
        Self { field, error }
    }

    /// Whether the message belongs next to an input (label, amount) rather
    /// than in a transient notice (e.g. a missing photo).
    pub fn is_inline(&self) -> bool {
        matches!(self.field, FormField::Label | FormField::Amount)
    }

    /// The transient notice for errors that are not shown inline.
    pub fn alert(&self) -> Option<Alert> {
        if self.is_inline() {
            None
        } else {
            Some(self.error.alert())
        }
    }
}

impl TransactionForm {
    /// Prefill the edit screen with the fields of `transaction`.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            label: transaction.label.to_string(),
            amount: transaction.amount.to_string(),
            description: transaction.description.clone(),
            transaction_type: transaction.transaction_type.code().to_owned(),
            category: transaction.category.code().to_owned(),
            photo: transaction.photo.clone(),
        }
    }

    /// Validate the form for creating a new transaction.
    ///
    /// Fields are checked in the order label, amount, type, category, photo
    /// and the first failure is returned. A photo is required.
    ///
    /// # Errors
    /// Returns a [FormError] naming the first invalid field.
    pub fn validate_new(&self) -> Result<TransactionBuilder, FormError> {
        let builder = self.validate_fields()?;

        if builder.photo.is_none() {
            return Err(FormError::new(FormField::Photo, Error::MissingPhoto));
        }

        Ok(builder)
    }

    /// Validate the form for updating the transaction with `id`.
    ///
    /// Unlike [TransactionForm::validate_new], the photo is optional.
    ///
    /// # Errors
    /// Returns a [FormError] naming the first invalid field.
    pub fn validate_update(&self, id: TransactionId) -> Result<Transaction, FormError> {
        Ok(self.validate_fields()?.finalise(id))
    }

    fn validate_fields(&self) -> Result<TransactionBuilder, FormError> {
        let label =
            Label::new(&self.label).map_err(|error| FormError::new(FormField::Label, error))?;
        let amount =
            parse_amount(&self.amount).map_err(|error| FormError::new(FormField::Amount, error))?;
        let transaction_type = self
            .transaction_type
            .parse()
            .map_err(|error| FormError::new(FormField::TransactionType, error))?;
        let category = self
            .category
            .parse()
            .map_err(|error| FormError::new(FormField::Category, error))?;

        Ok(Transaction::build(label, amount)
            .description(&self.description)
            .transaction_type(transaction_type)
            .category(category)
            .photo(self.photo.clone()))
    }
}

/// Parse the text of an amount input.
///
/// Amounts are stored as a magnitude, so a leading minus sign is dropped.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the text is not a finite number.
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    match text.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount.abs()),
        _ => Err(Error::InvalidAmount(text.to_owned())),
    }
}
