//! Budget Manager is a personal budgeting tool for recording income and
//! expenses, grouping them into categories and tracking monthly budgets.
//!
//! This library provides the SQLite backed store and the reports built on it.
//! Every function takes a borrowed [rusqlite::Connection]; callers own a single
//! connection, usually created with [db::open].

#![warn(missing_docs)]

pub mod budget;
pub mod category;
pub mod currency;
pub mod database_id;
pub mod db;
mod error;
pub mod export;
pub mod logging;
pub mod month;
pub mod report;
pub mod summary;
pub mod transaction;

pub use db::initialize as initialize_db;
pub use error::Error;
pub use month::MonthKey;
