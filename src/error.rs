//! Defines the crate level error type and the conversion from SQLite errors.

/// The errors that may occur in the budget manager.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryName(String),

    /// A string could not be parsed as a `YYYY-MM` month key.
    #[error("\"{0}\" is not a valid month, expected the format YYYY-MM")]
    InvalidMonth(String),

    /// A string could not be parsed as a transaction kind.
    #[error("\"{0}\" is not a valid transaction kind, expected \"income\" or \"expense\"")]
    InvalidKind(String),

    /// An amount entered by the user was zero, negative or not a number.
    #[error("{0} must be positive, got {1}")]
    NonPositiveAmount(&'static str, f64),

    /// Writing the CSV export failed.
    #[error("could not export transactions: {0}")]
    ExportError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::ExportError(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::ExportError(value.to_string())
    }
}
