//! Monthly spending ceilings per category.

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, month::MonthKey};

/// The amount budgeted for one category in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The category the budget applies to.
    pub category: String,
    /// The month the budget applies to.
    pub month: MonthKey,
    /// The spending ceiling.
    pub amount: f64,
}

/// Set the budget for `category` in `month`, replacing any existing amount.
///
/// There is never more than one budget per category and month.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn set_budget(
    category: &str,
    amount: f64,
    month: MonthKey,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO budget (category, amount, month) VALUES (?1, ?2, ?3)
         ON CONFLICT(category, month) DO UPDATE SET amount = excluded.amount",
        (category, amount, month),
    )?;

    tracing::debug!("Set budget for {category} in {month} to {amount}");

    Ok(())
}

/// Get the budget for `category` in `month`.
///
/// Returns `0.0` if no budget has been set for the pair.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_budget(category: &str, month: MonthKey, connection: &Connection) -> Result<f64, Error> {
    let amount = connection
        .query_row(
            "SELECT amount FROM budget WHERE category = ?1 AND month = ?2",
            (category, month),
            |row| row.get(0),
        )
        .optional()?;

    Ok(amount.unwrap_or(0.0))
}

/// Get every budget set for `month`, ordered by category name.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_budgets_for_month(
    month: MonthKey,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT category, month, amount FROM budget WHERE month = ?1 ORDER BY category ASC",
        )?
        .query_map([month], map_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            month TEXT NOT NULL,
            UNIQUE(category, month)
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        category: row.get(0)?,
        month: row.get(1)?,
        amount: row.get(2)?,
    })
}
