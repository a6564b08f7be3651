//! Monthly aggregation of transaction amounts by category.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::{Error, month::MonthKey};

/// Sum the amounts of the transactions in `month`, grouped by category.
///
/// A transaction is in the month when the year-month prefix of its date
/// equals `month`. Categories without transactions in the month are absent
/// from the result rather than present with zero.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_monthly_totals(
    month: MonthKey,
    connection: &Connection,
) -> Result<HashMap<String, f64>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount)
            FROM \"transaction\"
            WHERE strftime('%Y-%m', date) = ?1
            GROUP BY category",
        )?
        .query_map([month], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}
