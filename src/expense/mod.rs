//! Expense tracking for the application.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and database functions for storing, querying, and
//!   deleting expenses with per-user ownership
//! - The `ExpenseFilter` for narrowing listings by month, date, or category
//! - Aggregation over listings: running totals and per-category summaries
//! - The route handlers for the expense-related pages

mod add_page;
mod aggregate;
mod delete_endpoint;
mod filter;
mod filter_category_page;
mod home_page;
mod store;
mod table;
mod top_categories_page;
mod view_page;

pub use add_page::{get_add_expense_page, post_add_expense};
pub use delete_endpoint::delete_expense_endpoint;
pub use filter_category_page::{get_filter_category_page, post_filter_category};
pub use home_page::get_home_page;
pub use store::create_expense_table;
pub use top_categories_page::get_top_categories_page;
pub use view_page::get_expenses_view_page;

#[cfg(test)]
pub use store::{Expense, create_expense, get_expenses};

#[cfg(test)]
pub use filter::ExpenseFilter;
