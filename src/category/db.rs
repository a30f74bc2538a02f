//! Database operations for categories.

use std::str::FromStr;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryKind, CategoryName},
    database_id::CategoryId,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_category(
    name: CategoryName,
    kind: CategoryKind,
    icon: &str,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO Categories (name, type, icon) VALUES (?1, ?2, ?3);",
        (name.as_ref(), kind.to_string(), icon),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name,
        kind,
        icon: icon.to_string(),
    })
}

/// Retrieve a single category by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a valid category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, type, icon FROM Categories WHERE id = :id;")?
        .query_one(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories in insertion order.
///
/// Display ordering (income first, then expenses, each sorted by name) is a
/// presentation concern and lives with the caller, see
/// [crate::App::categories_for_display].
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, type, icon FROM Categories;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete a category by ID.
///
/// Deleting an id that is not in the database is a no-op, not an error.
/// Transactions referencing the category by name are left untouched; there is
/// no cascade.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM Categories WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        tracing::debug!("delete of category {category_id} affected no rows");
    }

    Ok(())
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS Categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT ''
        );",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_kind: String = row.get(2)?;
    let icon = row.get(3)?;

    // The type column only ever holds what CategoryKind::to_string wrote, so
    // a parse failure here means the file was edited out from under us.
    let kind = CategoryKind::from_str(&raw_kind).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown category type {raw_kind:?}").into(),
        )
    })?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        kind,
        icon,
    })
}
