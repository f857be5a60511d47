//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was spent or earned.
///
/// Stored as the text codes "0" (expense) and "1" (income).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money was spent.
    Expense,
    /// Money was earned.
    Income,
}

impl TransactionType {
    /// Every transaction type in display order.
    pub const ALL: [TransactionType; 2] = [TransactionType::Expense, TransactionType::Income];

    /// The code stored in the database.
    pub fn code(self) -> &'static str {
        match self {
            TransactionType::Expense => "0",
            TransactionType::Income => "1",
        }
    }

    /// The name shown to users.
    pub fn name(self) -> &'static str {
        match self {
            TransactionType::Expense => "Expense",
            TransactionType::Income => "Income",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "0" => Ok(TransactionType::Expense),
            "1" => Ok(TransactionType::Income),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a transaction was for.
///
/// Stored as the index of the category in [Category::ALL], as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Food and eating out.
    Food,
    /// Rent or mortgage payments.
    Rent,
    /// Fuel, fares and parking.
    Transportation,
    #[allow(missing_docs)]
    Entertainment,
    /// Wages and other regular pay.
    Salary,
    #[allow(missing_docs)]
    Groceries,
    /// Utilities, phone and other bills.
    Bill,
    /// Repairs and upkeep.
    Maintenance,
    /// Anything that does not fit the other categories.
    Others,
}

impl Category {
    /// The categories in the order of their codes.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Rent,
        Category::Transportation,
        Category::Entertainment,
        Category::Salary,
        Category::Groceries,
        Category::Bill,
        Category::Maintenance,
        Category::Others,
    ];

    /// The code stored in the database.
    pub fn code(self) -> &'static str {
        match self {
            Category::Food => "0",
            Category::Rent => "1",
            Category::Transportation => "2",
            Category::Entertainment => "3",
            Category::Salary => "4",
            Category::Groceries => "5",
            Category::Bill => "6",
            Category::Maintenance => "7",
            Category::Others => "8",
        }
    }

    /// The name shown to users.
    pub fn name(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Rent => "Rent",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Salary => "Salary",
            Category::Groceries => "Groceries",
            Category::Bill => "Bill",
            Category::Maintenance => "Maintenance",
            Category::Others => "Others",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.code() == code)
            .ok_or_else(|| Error::InvalidCategory(code.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A validated, non-empty transaction label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Label(String);

impl Label {
    /// Create a label.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyLabel] if `label` is empty
    /// after trimming whitespace.
    pub fn new(label: &str) -> Result<Self, Error> {
        let label = label.trim();

        if label.is_empty() {
            Err(Error::EmptyLabel)
        } else {
            Ok(Self(label.to_string()))
        }
    }

    /// Create a label without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub(crate) fn new_unchecked(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::new(s)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the store.
    pub id: TransactionId,
    /// A short name for the transaction.
    pub label: Label,
    /// The magnitude of the amount spent or earned, the sign comes from
    /// `transaction_type`.
    pub amount: f64,
    /// A free text description, may be empty.
    pub description: String,
    /// Whether the money was spent or earned.
    pub transaction_type: TransactionType,
    /// What the transaction was for.
    pub category: Category,
    /// An encoded image, e.g. a photo of the receipt. Never decoded here.
    #[serde(skip)]
    pub photo: Option<Vec<u8>>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(label: Label, amount: f64) -> TransactionBuilder {
        TransactionBuilder {
            label,
            amount,
            description: String::new(),
            transaction_type: TransactionType::Expense,
            category: Category::Food,
            photo: None,
        }
    }

    /// Copy the fields of the transaction into a builder, dropping the ID.
    ///
    /// Inserting the builder creates a new transaction with a new ID.
    pub fn to_builder(&self) -> TransactionBuilder {
        TransactionBuilder {
            label: self.label.clone(),
            amount: self.amount,
            description: self.description.clone(),
            transaction_type: self.transaction_type,
            category: self.category,
            photo: self.photo.clone(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder holds every field except the ID, which the store assigns on
/// insert.
///
/// # Examples
///
/// ```
/// use fincti_rs::{Category, Label, Transaction, TransactionType};
///
/// let coffee = Transaction::build(Label::new("Coffee").unwrap(), 4.5)
///     .description("Flat white")
///     .transaction_type(TransactionType::Expense)
///     .category(Category::Food);
///
/// assert_eq!(coffee.amount, 4.5);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A short name for the transaction.
    pub label: Label,

    /// The magnitude of the amount spent or earned.
    ///
    /// The store rejects negative and non-finite amounts. Whether the amount
    /// is money in or out is decided by `transaction_type`.
    pub amount: f64,

    /// A free text description, defaults to an empty string.
    pub description: String,

    /// Defaults to [TransactionType::Expense].
    pub transaction_type: TransactionType,

    /// Defaults to [Category::Food].
    pub category: Category,

    /// An encoded image, opaque to the store.
    pub photo: Option<Vec<u8>>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the type for the transaction.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the photo for the transaction.
    pub fn photo(mut self, photo: Option<Vec<u8>>) -> Self {
        self.photo = photo;
        self
    }

    /// Attach the store assigned `id`.
    pub fn finalise(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            label: self.label,
            amount: self.amount,
            description: self.description,
            transaction_type: self.transaction_type,
            category: self.category,
            photo: self.photo,
        }
    }
}

/// Restricts which transactions a query returns.
///
/// Holds at most one type and one category. `None` on an axis matches
/// everything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only include transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions in this category.
    pub category: Option<Category>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

fn check_amount(amount: f64) -> Result<(), Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidAmount(amount.to_string()))
    }
}

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not finite,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    check_amount(builder.amount)?;

    let transaction = connection
        .prepare(
            "INSERT INTO transactions (label, amount, description, type, category, photo)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, label, amount, description, type, category, photo",
        )?
        .query_row(
            (
                builder.label.as_ref(),
                builder.amount,
                &builder.description,
                builder.transaction_type.code(),
                builder.category.code(),
                &builder.photo,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, label, amount, description, type, category, photo \
            FROM transactions WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

type RowsAffected = usize;

/// Replace every field of the transaction with the same ID.
///
/// Updating an ID that is not in the database changes nothing and returns 0.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not finite,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    check_amount(transaction.amount)?;

    connection
        .execute(
            "UPDATE transactions
             SET label = ?1, amount = ?2, description = ?3, type = ?4, category = ?5, photo = ?6
             WHERE id = ?7",
            (
                transaction.label.as_ref(),
                transaction.amount,
                &transaction.description,
                transaction.transaction_type.code(),
                transaction.category.code(),
                &transaction.photo,
                transaction.id,
            ),
        )
        .map_err(|error| error.into())
}

/// Delete the transaction with `id`.
///
/// Deleting an ID that is not in the database changes nothing and returns 0.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM transactions WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Get the transactions matching `filter` in insertion order.
///
/// The result comes from a single statement, so it reflects one consistent
/// view of the table.
///
/// # Errors
/// This function will return a [Error::SqlError] there is a SQL error.
pub fn query_transactions(
    filter: TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut query_string_parts = vec![
        "SELECT id, label, amount, description, type, category, photo FROM transactions"
            .to_string(),
    ];
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    if let Some(transaction_type) = filter.transaction_type {
        where_clause_parts.push(format!("type = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(transaction_type.code().to_owned()));
    }

    if let Some(category) = filter.category {
        where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
        query_parameters.push(Value::Text(category.code().to_owned()));
    }

    if !where_clause_parts.is_empty() {
        query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
    }

    query_string_parts.push("ORDER BY id ASC".to_owned());

    let query_string = query_string_parts.join(" ");

    connection
        .prepare(&query_string)?
        .query_map(params_from_iter(query_parameters.iter()), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub(crate) fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL,
                amount REAL NOT NULL,
                description TEXT NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                photo BLOB
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT INTO sqlite_sequence (name, seq)
         SELECT 'transactions', 0
         WHERE NOT EXISTS (SELECT 1 FROM sqlite_sequence WHERE name = 'transactions')",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_type_category ON transactions(type, category);",
        (),
    )?;

    Ok(())
}

fn parse_code<T>(row: &Row, index: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr<Err = Error>,
{
    let code: String = row.get(index)?;

    code.parse().map_err(|error: Error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let label: String = row.get(1)?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let transaction_type = parse_code(row, 4)?;
    let category = parse_code(row, 5)?;
    let photo = row.get(6)?;

    Ok(Transaction {
        id,
        label: Label::new_unchecked(&label),
        amount,
        description,
        transaction_type,
        category,
        photo,
    })
}

// ============================================================================
// TESTS
// ============================================================================
