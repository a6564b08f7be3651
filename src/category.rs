//! This file defines the `Category` type and the default categories.
//! A category is a named bucket, typed as income or expense, used to classify
//! transactions and budgets.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::CategoryId, transaction::TransactionKind};

mod db;

pub use db::{
    category_exists, create_category, create_category_table, get_all_categories,
    get_category_names, seed_default_categories,
};

/// The categories added to a new database.
pub const DEFAULT_CATEGORIES: [(&str, TransactionKind); 6] = [
    ("Food", TransactionKind::Expense),
    ("Transport", TransactionKind::Expense),
    ("Entertainment", TransactionKind::Expense),
    ("Utilities", TransactionKind::Expense),
    ("Salary", TransactionKind::Income),
    ("Freelance", TransactionKind::Income),
];

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed. Names are case-sensitive.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for grouping transactions, e.g. 'Food' or 'Salary'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,

    /// The unique name of the category.
    pub name: CategoryName,

    /// Whether the category holds income or expenses.
    pub kind: TransactionKind,
}
