//! Income/expense/balance aggregation over all recorded transactions.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The category names whose transactions count as income.
///
/// Matched case-insensitively against each transaction's category; everything
/// that does not match is an expense.
pub const INCOME_CATEGORIES: [&str; 5] = ["Salary", "Bonus", "Investment", "Gift", "Other Income"];

/// Whether transactions in `category` count towards income.
pub fn is_income_category(category: &str) -> bool {
    INCOME_CATEGORIES
        .iter()
        .any(|income_category| income_category.eq_ignore_ascii_case(category))
}

/// Totals of income and expenses over all recorded transactions.
///
/// Derived data: recomputed in full on every request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all transactions in an income category.
    pub total_income: f64,
    /// The sum of all transactions in any other category.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub balance: f64,
}

/// Compute the summary by scanning every transaction once.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_summary(connection: &Connection) -> Result<Summary, Error> {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;

    let mut statement = connection.prepare("SELECT category, amount FROM Transactions")?;
    let rows = statement.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
    })?;

    for row in rows {
        let (category, amount) = row?;

        if is_income_category(&category) {
            total_income += amount;
        } else {
            total_expenses += amount;
        }
    }

    Ok(Summary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
    })
}

#[cfg(test)]
mod summary_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::CategoryName,
        db::initialize,
        summary::{Summary, get_summary, is_income_category},
        transaction::{Transaction, create_transaction},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn income_set_matches_case_insensitively() {
        assert!(is_income_category("Salary"));
        assert!(is_income_category("salary"));
        assert!(is_income_category("SALARY"));
        assert!(is_income_category("other income"));
        assert!(!is_income_category("Groceries"));
        assert!(!is_income_category("Salaries"));
    }

    #[test]
    fn summary_of_empty_database_is_zero() {
        let conn = get_test_connection();

        let summary = get_summary(&conn).unwrap();

        assert_eq!(
            summary,
            Summary {
                total_income: 0.0,
                total_expenses: 0.0,
                balance: 0.0
            }
        );
    }

    #[test]
    fn summary_classifies_income_and_expenses() {
        let conn = get_test_connection();
        create_transaction(
            Transaction::build(
                50_000.0,
                date!(2024 - 01 - 05),
                CategoryName::new_unchecked("Salary"),
            ),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(
                1200.0,
                date!(2024 - 01 - 10),
                CategoryName::new_unchecked("Groceries"),
            )
            .notes("weekly"),
            &conn,
        )
        .unwrap();

        let summary = get_summary(&conn).unwrap();

        assert_eq!(summary.total_income, 50_000.0);
        assert_eq!(summary.total_expenses, 1200.0);
        assert_eq!(summary.balance, 48_800.0);
    }

    #[test]
    fn summary_handles_mixed_case_categories() {
        let conn = get_test_connection();
        let today = date!(2024 - 01 - 05);
        create_transaction(
            Transaction::build(100.0, today, CategoryName::new_unchecked("bonus")),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(40.0, today, CategoryName::new_unchecked("GIFT")),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(25.0, today, CategoryName::new_unchecked("Eating Out")),
            &conn,
        )
        .unwrap();

        let summary = get_summary(&conn).unwrap();

        assert_eq!(summary.total_income, 140.0);
        assert_eq!(summary.total_expenses, 25.0);
        assert_eq!(summary.balance, 115.0);
    }
}
