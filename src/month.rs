//! The `YYYY-MM` month key used for budgets and monthly aggregation.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};

use crate::Error;

/// A calendar month, e.g. `2023-10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: Month,
}

impl MonthKey {
    /// Create a month key from a year and month.
    pub const fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The current month, see [today].
    pub fn current() -> Self {
        Self::from_date(today())
    }
}

/// Today's date in the local timezone, falling back to UTC when the local
/// offset cannot be determined.
pub fn today() -> Date {
    let now = OffsetDateTime::now_local().unwrap_or_else(|error| {
        tracing::debug!("Could not get local offset, using UTC: {error}");
        OffsetDateTime::now_utc()
    });

    now.date()
}

impl FromStr for MonthKey {
    type Err = Error;

    /// Parse a `YYYY-MM` string.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] unless `s` is a four digit year, a dash
    /// and a two digit month between 01 and 12.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|byte| byte.is_ascii_digit())
            || !month.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self::new(year, month))
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

impl ToSql for MonthKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for MonthKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::{Error, month::MonthKey};

    #[test]
    fn parses_valid_month() {
        let month: MonthKey = "2023-10".parse().unwrap();

        assert_eq!(month, MonthKey::new(2023, Month::October));
    }

    #[test]
    fn displays_with_zero_padding() {
        let month = MonthKey::new(2024, Month::March);

        assert_eq!(month.to_string(), "2024-03");
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert_eq!(
            "2023-13".parse::<MonthKey>(),
            Err(Error::InvalidMonth("2023-13".to_owned()))
        );
        assert_eq!(
            "2023-00".parse::<MonthKey>(),
            Err(Error::InvalidMonth("2023-00".to_owned()))
        );
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in ["23-10", "2023-1", "2023/10", "2023-10-01", "", "abcd-ef", "+023-10"] {
            assert_eq!(
                input.parse::<MonthKey>(),
                Err(Error::InvalidMonth(input.to_owned())),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn from_date_uses_year_and_month() {
        let month = MonthKey::from_date(date!(2023 - 11 - 30));

        assert_eq!(month, MonthKey::new(2023, Month::November));
        assert_eq!(month, MonthKey::from_date(date!(2023 - 11 - 01)));
        assert_ne!(month, MonthKey::from_date(date!(2023 - 10 - 31)));
        assert_ne!(month, MonthKey::from_date(date!(2024 - 11 - 01)));
    }

    #[test]
    fn round_trips_through_sqlite_text() {
        let connection = rusqlite::Connection::open_in_memory().unwrap();
        let month = MonthKey::new(2023, Month::October);

        let stored: String = connection
            .query_row("SELECT ?1", [month], |row| row.get(0))
            .unwrap();
        let loaded: MonthKey = connection
            .query_row("SELECT ?1", [&stored], |row| row.get(0))
            .unwrap();

        assert_eq!(stored, "2023-10");
        assert_eq!(loaded, month);
    }
}
