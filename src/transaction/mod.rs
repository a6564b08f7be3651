//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The `TransactionKind` distinguishing income from expenses
//! - Database functions for storing, querying, and managing transactions

mod core;
mod kind;
mod query;

pub use core::{
    Transaction, TransactionBuilder, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, edit_transaction, get_transaction,
    map_transaction_row, update_transaction, validate_positive_amount,
};
pub use kind::TransactionKind;
pub use query::{TransactionFilter, get_all_transactions, get_transactions};
