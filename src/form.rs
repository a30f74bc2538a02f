//! Validation of raw form fields into well-typed arguments.
//!
//! The storage engine only ever sees validated values; everything the user
//! typed passes through here first. Failed validation leaves the form data
//! untouched so the caller can re-prompt and retry.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    category::{Category, CategoryKind, CategoryName},
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// The raw field values of the transaction entry form.
#[derive(Debug, Clone, Default)]
pub struct TransactionFormData {
    /// The date field, expected as `yyyy-MM-dd`.
    pub date: String,
    /// The category field; must name a defined category.
    pub category: String,
    /// The amount field; must parse as a number greater than zero.
    pub amount: String,
    /// The notes field; free text, may be empty.
    pub notes: String,
}

/// A transaction form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTransaction {
    /// The parsed transaction date.
    pub date: Date,
    /// The matched category name, as the user defined it.
    pub category: CategoryName,
    /// The parsed amount, guaranteed greater than zero.
    pub amount: f64,
    /// The trimmed notes.
    pub notes: String,
}

/// The raw field values of the category entry form.
#[derive(Debug, Clone, Default)]
pub struct CategoryFormData {
    /// The name field; must not be empty.
    pub name: String,
    /// The type field; must be `Income` or `Expense` (any case).
    pub kind: String,
    /// The icon field; free text, may be empty.
    pub icon: String,
}

/// A category form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCategory {
    /// The validated category name.
    pub name: CategoryName,
    /// The parsed category kind.
    pub kind: CategoryKind,
    /// The trimmed icon text.
    pub icon: String,
}

/// Validate the raw fields of a transaction form.
///
/// The category must match one of `known_categories` by name
/// (case-insensitively); the matched category's own spelling is what ends up
/// stored, so a lower-cased entry still classifies the same way in the
/// summary.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidDateFormat] if the date is not a valid `yyyy-MM-dd` date,
/// - [Error::InvalidAmount] if the amount is not a finite number,
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - [Error::UnknownCategory] if the category does not match any defined
///   category.
pub fn validate_transaction_form(
    form: &TransactionFormData,
    known_categories: &[Category],
) -> Result<ValidTransaction, Error> {
    let raw_date = form.date.trim();
    let date = Date::parse(raw_date, DATE_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), raw_date.to_string()))?;

    let raw_amount = form.amount.trim();
    let amount: f64 = raw_amount
        .parse()
        .map_err(|_| Error::InvalidAmount(raw_amount.to_string()))?;

    // parse() accepts "inf" and "NaN", neither of which belongs in a ledger.
    if !amount.is_finite() {
        return Err(Error::InvalidAmount(raw_amount.to_string()));
    }

    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount(amount));
    }

    let raw_category = form.category.trim();
    let category = known_categories
        .iter()
        .find(|category| category.name.as_ref().eq_ignore_ascii_case(raw_category))
        .map(|category| category.name.clone())
        .ok_or_else(|| Error::UnknownCategory(raw_category.to_string()))?;

    Ok(ValidTransaction {
        date,
        category,
        amount,
        notes: form.notes.trim().to_string(),
    })
}

/// Validate the raw fields of a category form.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyCategoryName] if the name is empty or just whitespace,
/// - [Error::InvalidCategoryKind] if the type is not `Income` or `Expense`.
pub fn validate_category_form(form: &CategoryFormData) -> Result<ValidCategory, Error> {
    let name = CategoryName::new(&form.name)?;
    let kind = form.kind.trim().parse()?;

    Ok(ValidCategory {
        name,
        kind,
        icon: form.icon.trim().to_string(),
    })
}
