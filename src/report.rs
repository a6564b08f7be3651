//! Reports derived from budgets and monthly totals.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error, budget::get_budgets_for_month, month::MonthKey, summary::get_monthly_totals,
    transaction::TransactionKind,
};

/// How much of a category's budget has been used in a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    /// The budgeted category.
    pub category: String,
    /// The budget for the month.
    pub budget: f64,
    /// The absolute value of the category's total for the month.
    pub spent: f64,
    /// `budget - spent`, negative when over budget.
    pub remaining: f64,
}

/// Income and expense totals for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    /// The month summarised.
    pub month: MonthKey,
    /// The sum of income amounts.
    pub income: f64,
    /// The sum of expense amounts, usually negative.
    pub expenses: f64,
    /// `income + expenses`.
    pub net: f64,
}

/// Compare each budget set for `month` against what was spent in its category.
///
/// Only categories with a budget for the month are included, ordered by
/// category name.
///
/// # Errors
/// Returns [Error::SqlError] if either query fails.
pub fn get_budget_statuses(
    month: MonthKey,
    connection: &Connection,
) -> Result<Vec<BudgetStatus>, Error> {
    let totals = get_monthly_totals(month, connection)?;

    let statuses = get_budgets_for_month(month, connection)?
        .into_iter()
        .map(|budget| {
            let spent = totals
                .get(&budget.category)
                .copied()
                .unwrap_or_default()
                .abs();

            BudgetStatus {
                remaining: budget.amount - spent,
                category: budget.category,
                budget: budget.amount,
                spent,
            }
        })
        .collect();

    Ok(statuses)
}

/// Sum the month's transactions by kind.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_month_summary(month: MonthKey, connection: &Connection) -> Result<MonthSummary, Error> {
    let mut income = 0.0;
    let mut expenses = 0.0;

    let mut statement = connection.prepare(
        "SELECT kind, SUM(amount)
        FROM \"transaction\"
        WHERE strftime('%Y-%m', date) = ?1
        GROUP BY kind",
    )?;
    let rows = statement.query_map([month], |row| {
        Ok((row.get::<_, TransactionKind>(0)?, row.get::<_, f64>(1)?))
    })?;

    for row in rows {
        match row? {
            (TransactionKind::Income, total) => income = total,
            (TransactionKind::Expense, total) => expenses = total,
        }
    }

    Ok(MonthSummary {
        month,
        income,
        expenses,
        net: income + expenses,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        budget::set_budget,
        db::initialize,
        month::MonthKey,
        report::{BudgetStatus, MonthSummary, get_budget_statuses, get_month_summary},
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    const OCTOBER: MonthKey = MonthKey::new(2023, Month::October);

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        for builder in [
            Transaction::build(date!(2023 - 10 - 01), TransactionKind::Income, "Salary", 5000.0),
            Transaction::build(date!(2023 - 10 - 05), TransactionKind::Expense, "Food", -200.0),
            Transaction::build(date!(2023 - 10 - 10), TransactionKind::Expense, "Transport", -175.0),
            Transaction::build(date!(2023 - 11 - 01), TransactionKind::Expense, "Food", -30.0),
        ] {
            create_transaction(builder, &conn).unwrap();
        }

        conn
    }

    #[test]
    fn budget_status_reports_spent_and_remaining() {
        let conn = get_test_connection();
        set_budget("Food", 300.0, OCTOBER, &conn).unwrap();
        set_budget("Transport", 150.0, OCTOBER, &conn).unwrap();
        set_budget("Utilities", 400.0, OCTOBER, &conn).unwrap();

        let statuses = get_budget_statuses(OCTOBER, &conn).unwrap();

        assert_eq!(
            statuses,
            vec![
                BudgetStatus {
                    category: "Food".to_owned(),
                    budget: 300.0,
                    spent: 200.0,
                    remaining: 100.0,
                },
                BudgetStatus {
                    category: "Transport".to_owned(),
                    budget: 150.0,
                    spent: 175.0,
                    remaining: -25.0,
                },
                BudgetStatus {
                    category: "Utilities".to_owned(),
                    budget: 400.0,
                    spent: 0.0,
                    remaining: 400.0,
                },
            ]
        );
    }

    #[test]
    fn budget_status_is_empty_without_budgets() {
        let conn = get_test_connection();

        let statuses = get_budget_statuses(OCTOBER, &conn).unwrap();

        assert!(statuses.is_empty());
    }

    #[test]
    fn month_summary_splits_income_and_expenses() {
        let conn = get_test_connection();

        let summary = get_month_summary(OCTOBER, &conn);

        assert_eq!(
            summary,
            Ok(MonthSummary {
                month: OCTOBER,
                income: 5000.0,
                expenses: -375.0,
                net: 4625.0,
            })
        );
    }

    #[test]
    fn month_summary_for_empty_month_is_zero() {
        let conn = get_test_connection();
        let month = MonthKey::new(2022, Month::January);

        let summary = get_month_summary(month, &conn).unwrap();

        assert_eq!(summary.income, 0.0);
        assert_eq!(summary.expenses, 0.0);
        assert_eq!(summary.net, 0.0);
    }
}
