//! Opening and bootstrapping the application's SQLite database.

use std::path::Path;

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, category::create_category_table, transaction::create_transaction_table};

/// Open the SQLite database at `path`, creating the file if it does not
/// exist.
///
/// # Errors
/// Returns an [Error::StorageUnavailable] if the file cannot be opened or
/// created, e.g. because the parent directory does not exist or is not
/// writable. This is fatal to startup and should be surfaced to the user.
pub fn open_database<P: AsRef<Path>>(path: P) -> Result<Connection, Error> {
    let path = path.as_ref();

    Connection::open(path)
        .map_err(|error| Error::StorageUnavailable(path.display().to_string(), error.to_string()))
}

/// Create the application tables if they do not exist.
///
/// Safe to call on every startup: the schema statements are all
/// `IF NOT EXISTS` and run inside a single exclusive transaction, so a
/// repeated call neither duplicates tables nor touches existing rows.
///
/// # Errors
/// Returns an [Error::SqlError] if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    create_category_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
