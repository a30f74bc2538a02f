//! FinTrack is a desktop app for recording personal income and expenses.
//!
//! This library provides the storage engine (a local SQLite database holding
//! transactions and user-defined categories, plus an income/expense/balance
//! summary derived from them) and the form controller that sits between raw
//! user input and the database. The front-end in `main.rs` is a thin console
//! loop; everything it does goes through [App].

#![warn(missing_docs)]

mod app;
mod app_state;
mod category;
mod database_id;
mod db;
mod display;
mod form;
mod summary;
mod transaction;

pub use app::App;
pub use app_state::AppState;
pub use category::{
    Category, CategoryKind, CategoryName, create_category, delete_category, get_all_categories,
    get_category,
};
pub use database_id::{CategoryId, DatabaseId, TransactionId};
pub use db::{initialize, open_database};
pub use display::currency;
pub use form::{
    CategoryFormData, TransactionFormData, ValidCategory, ValidTransaction,
    validate_category_form, validate_transaction_form,
};
pub use summary::{INCOME_CATEGORIES, Summary, get_summary, is_income_category};
pub use transaction::{
    Transaction, TransactionBuilder, count_transactions, create_transaction, delete_transaction,
    get_all_transactions, get_transaction, update_transaction,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The database file could not be opened or created.
    ///
    /// This is fatal to startup: without the backing store there is nothing
    /// for the application to do. The first field is the path, the second the
    /// underlying cause.
    #[error("could not open the database at \"{0}\": {1}")]
    StorageUnavailable(String, String),

    /// A zero or negative amount was used to create or update a transaction.
    ///
    /// Every stored transaction has a positive amount; whether it counts as
    /// income or an expense is decided by its category, not its sign.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    NonPositiveAmount(f64),

    /// The amount field could not be parsed as a number.
    #[error("could not parse \"{0}\" as an amount")]
    InvalidAmount(String),

    /// There was an error parsing the date field.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not parse date string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The category type field did not match a known category kind.
    #[error("\"{0}\" is not a valid category type, expected \"Income\" or \"Expense\"")]
    InvalidCategoryKind(String),

    /// The category named on a transaction form does not match any defined
    /// category.
    #[error("\"{0}\" does not match any defined category")]
    UnknownCategory(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
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
