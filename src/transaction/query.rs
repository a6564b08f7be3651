//! Database queries for listing transactions.

use rusqlite::{Connection, ToSql};

use crate::{
    Error,
    transaction::{Transaction, TransactionKind, map_transaction_row},
};

/// Optional filters applied when listing transactions.
///
/// The default filter matches every transaction.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions with this exact category name.
    pub category: Option<String>,
    /// Only include transactions of this kind.
    pub kind: Option<TransactionKind>,
}

/// Get all transactions, most recent first.
///
/// Transactions on the same date are ordered by ID, newest first, so the
/// order is stable between calls.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    get_transactions(&TransactionFilter::default(), connection)
}

/// Get the transactions matching `filter`, most recent first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn get_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut conditions = Vec::new();
    let mut params: Vec<&dyn ToSql> = Vec::new();

    if let Some(category) = &filter.category {
        params.push(category);
        conditions.push(format!("category = ?{}", params.len()));
    }

    if let Some(kind) = &filter.kind {
        params.push(kind);
        conditions.push(format!("kind = ?{}", params.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let query = format!(
        "SELECT id, date, kind, category, amount, description FROM \"transaction\" \
        {where_clause} \
        ORDER BY date DESC, id DESC"
    );

    connection
        .prepare(&query)?
        .query_map(params.as_slice(), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}
