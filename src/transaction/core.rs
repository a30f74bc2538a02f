//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::CategoryName, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is always positive; whether it counts towards income or
/// expenses is decided by the category name (see [crate::get_summary]).
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// The name of the category the transaction belongs to.
    ///
    /// Categories are referenced by name, not by id: deleting a category
    /// leaves transactions that mention it untouched.
    pub category: CategoryName,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Free-form notes attached by the user.
    pub notes: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, category: CategoryName) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            category,
            notes: String::new(),
        }
    }
}

/// A builder holding the mutable fields of a transaction, used both to create
/// a new transaction and to replace the fields of an existing one.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction. Must be greater than zero.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// The name of the category the transaction belongs to.
    pub category: CategoryName,
    /// Free-form notes. Defaults to the empty string.
    pub notes: String,
}

impl TransactionBuilder {
    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative (nothing is
///   written in that case),
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if builder.amount <= 0.0 {
        return Err(Error::NonPositiveAmount(builder.amount));
    }

    let transaction = connection
        .prepare(
            "INSERT INTO Transactions (date, category, amount, notes)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, category, amount, notes",
        )?
        .query_one(
            (
                builder.date,
                builder.category.as_ref(),
                builder.amount,
                builder.notes,
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
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare("SELECT id, date, category, amount, notes FROM Transactions WHERE id = :id")?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all transactions, most recent date first.
///
/// Rows sharing a date are returned newest-insertion first (id descending),
/// matching the order the user expects from the transaction list.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, category, amount, notes FROM Transactions
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Replace the date, category, amount and notes of the transaction matching
/// `id`. The id itself is immutable.
///
/// Updating an id that is not in the database is a no-op, not an error; the
/// condition is logged at DEBUG for observability.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the new amount is zero or negative
///   (nothing is written in that case),
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    if builder.amount <= 0.0 {
        return Err(Error::NonPositiveAmount(builder.amount));
    }

    let rows_affected = connection.execute(
        "UPDATE Transactions
         SET date = ?1, category = ?2, amount = ?3, notes = ?4
         WHERE id = ?5",
        params![
            builder.date,
            builder.category.as_ref(),
            builder.amount,
            builder.notes,
            id,
        ],
    )?;

    if rows_affected == 0 {
        tracing::debug!("update of transaction {id} affected no rows");
    }

    Ok(())
}

/// Delete the transaction matching `id`.
///
/// Deleting an id that is not in the database is a no-op, not an error; the
/// condition is logged at DEBUG for observability.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM Transactions WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        tracing::debug!("delete of transaction {id} affected no rows");
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM Transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS Transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                notes TEXT NOT NULL DEFAULT ''
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('Transactions', 0)",
        (),
    )?;

    // Index used by the date-descending transaction list.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_date ON Transactions(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let raw_category: String = row.get(2)?;
    let amount = row.get(3)?;
    let notes = row.get(4)?;

    Ok(Transaction {
        id,
        date,
        category: CategoryName::new_unchecked(&raw_category),
        amount,
        notes,
    })
}

// ============================================================================
// TESTS
// ============================================================================
