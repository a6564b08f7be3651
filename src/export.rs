//! Export transactions as a CSV file.

use std::{fs::File, io::Write, path::Path};

use csv::Writer;
use rusqlite::Connection;
use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    transaction::{Transaction, get_all_transactions},
};

const FILE_NAME_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year][month][day]");

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Description")]
    description: &'a str,
}

impl<'a> From<&'a Transaction> for ExportRow<'a> {
    fn from(transaction: &'a Transaction) -> Self {
        Self {
            date: transaction.date.to_string(),
            kind: transaction.kind.label(),
            category: &transaction.category,
            amount: transaction.amount,
            description: &transaction.description,
        }
    }
}

/// Write `transactions` as CSV with the header
/// `Date,Type,Category,Amount,Description`.
///
/// The header is written even when there are no transactions.
///
/// # Errors
/// Returns [Error::ExportError] if a row cannot be serialized or written.
pub fn write_transactions_csv(transactions: &[Transaction], writer: impl Write) -> Result<(), Error> {
    let mut writer = Writer::from_writer(writer);

    if transactions.is_empty() {
        writer.write_record(["Date", "Type", "Category", "Amount", "Description"])?;
    }

    for transaction in transactions {
        writer.serialize(ExportRow::from(transaction))?;
    }

    writer.flush()?;

    Ok(())
}

/// The default file name for an export made on `date`, e.g.
/// `budget_export_20231005.csv`.
pub fn default_export_file_name(date: Date) -> String {
    let formatted_date = date
        .format(FILE_NAME_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string().replace('-', ""));

    format!("budget_export_{formatted_date}.csv")
}

/// Write every transaction, most recent first, to a CSV file at `path`.
///
/// Returns the number of transactions written.
///
/// # Errors
/// Returns an [Error::ExportError] if the file cannot be created or written,
/// or an [Error::SqlError] if the transactions cannot be read.
pub fn export_transactions(path: &Path, connection: &Connection) -> Result<usize, Error> {
    let transactions = get_all_transactions(connection)?;
    let file = File::create(path)?;

    write_transactions_csv(&transactions, file)?;

    tracing::info!(
        "Exported {} transactions to {}",
        transactions.len(),
        path.display()
    );

    Ok(transactions.len())
}
