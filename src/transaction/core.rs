//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::TransactionKind,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The name of the category the transaction belongs to, e.g. "Food".
    ///
    /// This is free text and is not checked against the category table.
    pub category: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        date: Date,
        kind: TransactionKind,
        category: &str,
        amount: f64,
    ) -> TransactionBuilder {
        TransactionBuilder {
            date,
            kind,
            category: category.to_owned(),
            amount,
            description: String::new(),
        }
    }
}

/// A builder for creating and overwriting [Transaction] records.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// let transaction = create_transaction(
///     Transaction::build(date!(2023-10-05), TransactionKind::Expense, "Food", -50.0)
///         .description("Groceries"),
///     &connection,
/// )?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The date when the transaction occurred.
    pub date: Date,

    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,

    /// The category name, e.g. "Food", "Salary".
    pub category: String,

    /// The monetary amount of the transaction.
    ///
    /// The store does not enforce a sign convention. The command line
    /// interface records expenses as negative amounts and income as positive
    /// amounts, so that monthly totals can be summed directly.
    ///
    /// # Examples
    /// - `5000.00` - Salary deposit
    /// - `-50.00` - Groceries
    pub amount: f64,

    /// A human-readable description of the transaction. Defaults to "".
    pub description: String,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    fn finalise(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            description: self.description,
        }
    }
}

/// Check that `amount` entered for `field` is a finite number above zero.
///
/// Users enter magnitudes; [TransactionKind::signed_amount] gives the stored
/// sign.
///
/// # Errors
/// Returns [Error::NonPositiveAmount] for zero, negative, infinite or NaN
/// amounts.
pub fn validate_positive_amount(amount: f64, field: &'static str) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::NonPositiveAmount(field, amount))
    }
}

impl From<Transaction> for TransactionBuilder {
    fn from(transaction: Transaction) -> Self {
        TransactionBuilder {
            date: transaction.date,
            kind: transaction.kind,
            category: transaction.category,
            amount: transaction.amount,
            description: transaction.description,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// Neither the kind nor the category are checked against the category table.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (date, kind, category, amount, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            builder.date,
            builder.kind,
            &builder.category,
            builder.amount,
            &builder.description,
        ),
    )?;

    let id = connection.last_insert_rowid();
    tracing::debug!("Created transaction {id}");

    Ok(builder.finalise(id))
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
            "SELECT id, date, kind, category, amount, description FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Overwrite every field of the transaction with `id`.
///
/// Returns `false` if no transaction has the ID, in which case nothing is
/// changed. A missing ID is not treated as an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET date = ?1, kind = ?2, category = ?3, amount = ?4, description = ?5
         WHERE id = ?6",
        (
            builder.date,
            builder.kind,
            &builder.category,
            builder.amount,
            &builder.description,
            id,
        ),
    )?;

    if rows_affected == 0 {
        tracing::debug!("Tried to update missing transaction {id}");
    }

    Ok(rows_affected > 0)
}

/// Load the transaction with `id`, change it with `edit` and write it back.
///
/// Returns `false` without calling `edit` if no transaction has the ID,
/// matching [update_transaction].
///
/// # Errors
/// This function will return any error from `edit`, in which case nothing is
/// written, or a [Error::SqlError] if there is some SQL error.
pub fn edit_transaction<F>(
    id: TransactionId,
    edit: F,
    connection: &Connection,
) -> Result<bool, Error>
where
    F: FnOnce(&mut TransactionBuilder) -> Result<(), Error>,
{
    let mut builder = match get_transaction(id, connection) {
        Ok(transaction) => TransactionBuilder::from(transaction),
        Err(Error::NotFound) => {
            tracing::debug!("Tried to edit missing transaction {id}");
            return Ok(false);
        }
        Err(error) => return Err(error),
    };

    edit(&mut builder)?;

    update_transaction(id, builder, connection)
}

/// Delete the transaction with `id`.
///
/// Returns `false` if no transaction has the ID. Deleting a missing
/// transaction is not treated as an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<bool, Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        tracing::debug!("Tried to delete missing transaction {id}");
    }

    Ok(rows_affected > 0)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                kind TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                description TEXT NOT NULL DEFAULT ''
                )",
        (),
    )?;

    // Used by the monthly aggregation and the date ordered listing.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_category ON \"transaction\"(date, category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns `id, date, kind, category, amount, description`.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let kind = row.get(2)?;
    let category = row.get(3)?;
    let amount = row.get(4)?;
    let description = row.get(5)?;

    Ok(Transaction {
        id,
        date,
        kind,
        category,
        amount,
        description,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            Transaction, TransactionKind, count_transactions, create_transaction,
            delete_transaction, edit_transaction, get_all_transactions, get_transaction,
            update_transaction, validate_positive_amount,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0)
                .description("Groceries"),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert!(transaction.id > 0);
                assert_eq!(transaction.amount, -50.0);
                assert_eq!(transaction.description, "Groceries");
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_defaults_to_empty_description() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0),
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.description, "");
    }

    #[test]
    fn create_accepts_unknown_category() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Pets", -12.0),
            &conn,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn created_transaction_is_listed_once_with_every_field() {
        let conn = get_test_connection();
        let created = create_transaction(
            Transaction::build(date!(2023 - 10 - 01), TransactionKind::Income, "Salary", 5000.0)
                .description("Monthly salary"),
            &conn,
        )
        .expect("Could not create transaction");

        let transactions = get_all_transactions(&conn).expect("Could not list transactions");

        let matches: Vec<_> = transactions
            .iter()
            .filter(|transaction| **transaction == created)
            .collect();
        assert_eq!(matches.len(), 1);
        let listed = matches[0];
        assert_eq!(listed.date, date!(2023 - 10 - 01));
        assert_eq!(listed.kind, TransactionKind::Income);
        assert_eq!(listed.category, "Salary");
        assert_eq!(listed.amount, 5000.0);
        assert_eq!(listed.description, "Monthly salary");
    }

    #[test]
    fn get_transaction_with_invalid_id_returns_not_found() {
        let conn = get_test_connection();

        let result = get_transaction(999, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_overwrites_one_row_and_leaves_others() {
        let conn = get_test_connection();
        let target = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0),
            &conn,
        )
        .unwrap();
        let other = create_transaction(
            Transaction::build(date!(2023 - 10 - 10), TransactionKind::Expense, "Transport", -20.0)
                .description("Bus ticket"),
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            target.id,
            Transaction::build(
                date!(2023 - 10 - 06),
                TransactionKind::Income,
                "Freelance",
                300.0,
            )
            .description("Side project"),
            &conn,
        );

        assert_eq!(updated, Ok(true));
        let got_target = get_transaction(target.id, &conn).unwrap();
        assert_eq!(
            got_target,
            Transaction {
                id: target.id,
                date: date!(2023 - 10 - 06),
                kind: TransactionKind::Income,
                category: "Freelance".to_owned(),
                amount: 300.0,
                description: "Side project".to_owned(),
            }
        );
        assert_eq!(get_transaction(other.id, &conn), Ok(other));
    }

    #[test]
    fn update_with_invalid_id_is_a_no_op() {
        let conn = get_test_connection();
        let existing = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0),
            &conn,
        )
        .unwrap();

        let result = update_transaction(
            existing.id + 100,
            Transaction::build(date!(2023 - 10 - 06), TransactionKind::Expense, "Food", -1.0),
            &conn,
        );

        assert_eq!(result, Ok(false));
        assert_eq!(get_all_transactions(&conn), Ok(vec![existing]));
    }

    #[test]
    fn edit_changes_only_the_edited_fields() {
        let conn = get_test_connection();
        let target = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0)
                .description("Groceries"),
            &conn,
        )
        .unwrap();

        let result = edit_transaction(
            target.id,
            |builder| {
                builder.amount = builder.kind.signed_amount(75.0);
                Ok(())
            },
            &conn,
        );

        assert_eq!(result, Ok(true));
        assert_eq!(
            get_transaction(target.id, &conn),
            Ok(Transaction {
                amount: -75.0,
                ..target
            })
        );
    }

    #[test]
    fn edit_with_invalid_id_is_a_no_op() {
        let conn = get_test_connection();
        let existing = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0),
            &conn,
        )
        .unwrap();
        let mut called = false;

        let result = edit_transaction(
            existing.id + 100,
            |_| {
                called = true;
                Ok(())
            },
            &conn,
        );

        assert_eq!(result, Ok(false));
        assert!(!called, "edit should not run for a missing transaction");
        assert_eq!(get_all_transactions(&conn), Ok(vec![existing]));
    }

    #[test]
    fn failed_edit_writes_nothing() {
        let conn = get_test_connection();
        let existing = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0),
            &conn,
        )
        .unwrap();

        let result = edit_transaction(
            existing.id,
            |builder| {
                builder.category = "Transport".to_owned();
                builder.amount = validate_positive_amount(-5.0, "Amount")?;
                Ok(())
            },
            &conn,
        );

        assert_eq!(result, Err(Error::NonPositiveAmount("Amount", -5.0)));
        assert_eq!(get_transaction(existing.id, &conn), Ok(existing));
    }

    #[test]
    fn positive_amounts_are_accepted() {
        assert_eq!(validate_positive_amount(0.01, "Amount"), Ok(0.01));
        assert_eq!(validate_positive_amount(5000.0, "Budget"), Ok(5000.0));
    }

    #[test]
    fn zero_negative_and_non_finite_amounts_are_rejected() {
        for amount in [0.0, -0.0, -50.0, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                validate_positive_amount(amount, "Amount"),
                Err(Error::NonPositiveAmount("Amount", amount)),
                "expected {amount} to be rejected"
            );
        }
        assert!(matches!(
            validate_positive_amount(f64::NAN, "Amount"),
            Err(Error::NonPositiveAmount("Amount", amount)) if amount.is_nan()
        ));
    }

    #[test]
    fn delete_removes_exactly_one_row() {
        let conn = get_test_connection();
        let target = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0),
            &conn,
        )
        .unwrap();
        let other = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0),
            &conn,
        )
        .unwrap();

        let result = delete_transaction(target.id, &conn);

        assert_eq!(result, Ok(true));
        assert_eq!(get_all_transactions(&conn), Ok(vec![other]));
    }

    #[test]
    fn delete_twice_is_a_no_op() {
        let conn = get_test_connection();
        let target = create_transaction(
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -50.0),
            &conn,
        )
        .unwrap();
        delete_transaction(target.id, &conn).unwrap();

        let result = delete_transaction(target.id, &conn);

        assert_eq!(result, Ok(false));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(today, TransactionKind::Income, "Salary", i as f64),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
