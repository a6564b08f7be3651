//! Opening and initializing the application's SQLite database.

use std::path::Path;

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    budget::create_budget_table,
    category::{create_category_table, seed_default_categories},
    transaction::create_transaction_table,
};

/// Create the application tables if they do not exist and seed the default
/// categories.
///
/// Safe to call every time the application starts.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created or the seed
/// categories cannot be inserted.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    seed_default_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Open the database at `path`, creating the file if needed, and initialize it.
///
/// # Errors
/// Returns an [Error::SqlError] if the file cannot be opened or initialized.
pub fn open(path: &Path) -> Result<Connection, Error> {
    tracing::debug!("Opening database at {}", path.display());

    let connection = Connection::open(path)?;
    initialize(&connection)?;

    Ok(connection)
}
