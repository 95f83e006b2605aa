//! The core data model and database queries for expenses.

use rusqlite::{Connection, Row, named_params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, user::UserID};

use super::filter::ExpenseFilter;

/// The ID of an expense record in the application database.
pub type ExpenseId = i64;

/// A single dated expense owned by one user.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The ID of the user that recorded this expense.
    pub user_id: UserID,
    /// When the money was spent.
    pub date: Date,
    /// The amount of money spent. Negative amounts are legal and represent
    /// refunds.
    pub amount: f64,
    /// The category of spending, e.g. "Groceries". Stored exactly as the user
    /// entered it.
    pub category: String,
    /// An optional note on what the expense was for.
    pub description: Option<String>,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(user_id: UserID, date: Date, amount: f64, category: &str) -> ExpenseBuilder {
        ExpenseBuilder {
            user_id,
            date,
            amount,
            category: category.to_owned(),
            description: None,
        }
    }
}

/// A builder for creating [Expense] instances.
///
/// Pass the finished builder to [create_expense] to persist the expense and
/// get back the stored record with its ID.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    /// The ID of the user that owns the expense.
    pub user_id: UserID,
    /// When the money was spent.
    pub date: Date,
    /// The amount of money spent.
    pub amount: f64,
    /// The category of spending.
    pub category: String,
    /// An optional note on what the expense was for.
    pub description: Option<String>,
}

impl ExpenseBuilder {
    /// Set the description for the expense.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Create the expense table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES user(id),
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT
                )",
        (),
    )?;

    // Index used by every per-user listing query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date)",
        (),
    )?;

    Ok(())
}

/// Create a new expense in the database from a builder.
///
/// # Errors
///
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_expense(builder: ExpenseBuilder, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expense (user_id, date, amount, category, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, date, amount, category, description",
        )?
        .query_row(
            (
                builder.user_id.as_i64(),
                builder.date,
                builder.amount,
                builder.category,
                builder.description,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Get the expenses owned by `user_id` that match `filter`.
///
/// Results are ordered by date descending. Ties are broken by ID ascending so
/// the order is deterministic within and across queries.
///
/// # Errors
///
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expenses(
    user_id: UserID,
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    const COLUMNS: &str = "id, user_id, date, amount, category, description";

    let expenses = match filter {
        ExpenseFilter::All => connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM expense
                 WHERE user_id = :user_id
                 ORDER BY date DESC, id ASC"
            ))?
            .query_map(
                named_params! { ":user_id": user_id.as_i64() },
                map_expense_row,
            )?
            .collect::<Result<Vec<_>, _>>()?,
        ExpenseFilter::Month { year, month } => {
            // Dates are stored as ISO-8601 text, so a year and month match is
            // a prefix match on the first seven characters.
            let month_prefix = format!("{year:04}-{:02}", u8::from(*month));

            connection
                .prepare(&format!(
                    "SELECT {COLUMNS} FROM expense
                     WHERE user_id = :user_id AND substr(date, 1, 7) = :month
                     ORDER BY date DESC, id ASC"
                ))?
                .query_map(
                    named_params! { ":user_id": user_id.as_i64(), ":month": month_prefix },
                    map_expense_row,
                )?
                .collect::<Result<Vec<_>, _>>()?
        }
        ExpenseFilter::Date(date) => connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM expense
                 WHERE user_id = :user_id AND date = :date
                 ORDER BY date DESC, id ASC"
            ))?
            .query_map(
                named_params! { ":user_id": user_id.as_i64(), ":date": date },
                map_expense_row,
            )?
            .collect::<Result<Vec<_>, _>>()?,
        ExpenseFilter::Category(category) => connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM expense
                 WHERE user_id = :user_id AND lower(category) = lower(:category)
                 ORDER BY date DESC, id ASC"
            ))?
            .query_map(
                named_params! { ":user_id": user_id.as_i64(), ":category": category },
                map_expense_row,
            )?
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(expenses)
}

/// Delete the expense with ID `expense_id` on behalf of `requester`.
///
/// The ownership check and the delete run while the caller holds the single
/// database connection, so a concurrent second delete of the same expense
/// observes [Error::NotFound] instead of corrupting state.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotFound] if `expense_id` does not refer to an expense,
/// - [Error::Forbidden] if the expense is owned by a different user,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn delete_expense(
    requester: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let owner_id: i64 = connection
        .prepare("SELECT user_id FROM expense WHERE id = :id")?
        .query_one(&[(":id", &expense_id)], |row| row.get(0))?;

    if owner_id != requester.as_i64() {
        return Err(Error::Forbidden);
    }

    connection.execute("DELETE FROM expense WHERE id = :id", &[(":id", &expense_id)])?;

    Ok(())
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_user_id: i64 = row.get(1)?;

    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(raw_user_id),
        date: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
    })
}
