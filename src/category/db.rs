//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryName, DEFAULT_CATEGORIES},
    transaction::TransactionKind,
};

/// Create a user defined category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    kind: TransactionKind,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (name, kind) VALUES (?1, ?2);",
            (name.as_ref(), kind),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name, kind })
}

/// Insert the default categories, skipping any whose name already exists.
///
/// Safe to call any number of times.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement =
        connection.prepare("INSERT OR IGNORE INTO category (name, kind) VALUES (?1, ?2);")?;

    for (name, kind) in DEFAULT_CATEGORIES {
        let rows_inserted = statement.execute((name, kind))?;

        if rows_inserted > 0 {
            tracing::debug!("Seeded default category {name}");
        }
    }

    Ok(())
}

/// Retrieve category names in the order they were created, optionally only
/// those of `kind`.
pub fn get_category_names(
    kind: Option<TransactionKind>,
    connection: &Connection,
) -> Result<Vec<String>, Error> {
    match kind {
        Some(kind) => connection
            .prepare("SELECT name FROM category WHERE kind = ?1 ORDER BY id ASC;")?
            .query_map([kind], |row| row.get(0))?
            .map(|maybe_name| maybe_name.map_err(|error| error.into()))
            .collect(),
        None => connection
            .prepare("SELECT name FROM category ORDER BY id ASC;")?
            .query_map([], |row| row.get(0))?
            .map(|maybe_name| maybe_name.map_err(|error| error.into()))
            .collect(),
    }
}

/// Retrieve all categories in the order they were created.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Whether a category named exactly `name` exists.
pub fn category_exists(name: &str, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM category WHERE name = ?1);",
            [name],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let kind = row.get(2)?;

    Ok(Category { id, name, kind })
}
