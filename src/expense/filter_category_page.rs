//! The page for listing the expenses in a single category.
//!
//! The match is an exact, case-insensitive comparison against the stored
//! category, not a substring search.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    endpoints,
    html::{self, base, format_currency, text_input},
    navigation::NavBar,
    user::UserID,
};

use super::{
    aggregate::sum_amounts,
    filter::ExpenseFilter,
    store::{Expense, get_expenses},
    table::expense_table,
};

/// The state needed for the category filter page.
#[derive(Debug, Clone)]
pub struct FilterCategoryState {
    /// The database connection for listing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for FilterCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data naming the category to list.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterCategoryData {
    /// The category to match, compared ignoring case.
    pub category: String,
}

fn filter_category_page(selected_category: Option<&str>, expenses: &[Expense]) -> Markup {
    let content = html! {
        (NavBar::new(endpoints::FILTER_CATEGORY).into_html())

        div class=(html::PAGE_CONTAINER_STYLE) {
            h1 class="text-2xl font-bold mb-4" { "Expenses by category" }

            form
                method="post"
                action=(endpoints::FILTER_CATEGORY)
                class="w-full max-w-2xl flex flex-wrap items-end gap-4 mb-6"
            {
                div class="grow" {
                    (text_input(
                        "category",
                        "Category",
                        "text",
                        selected_category.unwrap_or(""),
                        None,
                    ))
                }

                button
                    type="submit"
                    class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                        hover:dark:bg-blue-700 text-white rounded"
                {
                    "Search"
                }
            }

            @if let Some(selected_category) = selected_category {
                h2 class="text-xl font-semibold mb-2" {
                    "Matches for \"" (selected_category) "\""
                }

                (expense_table(expenses, false))

                p class="w-full max-w-2xl mt-4 text-lg font-semibold text-right" {
                    "Total: " (format_currency(sum_amounts(expenses)))
                }
            } @else {
                p class="text-gray-500 dark:text-gray-400" {
                    "Enter a category to see its expenses and total."
                }
            }
        }
    };

    base("By category", &content)
}

/// Display the category filter page with no category selected.
pub async fn get_filter_category_page() -> Markup {
    filter_category_page(None, &[])
}

/// Handler for category searches via the POST method.
///
/// Lists the current user's expenses whose category matches the submitted
/// value, ignoring case, together with their total.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn post_filter_category(
    State(state): State<FilterCategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<FilterCategoryData>,
) -> Response {
    let selected_category = form.category.trim().to_owned();

    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database lock");

    let filter = ExpenseFilter::Category(selected_category.clone());
    let expenses = match get_expenses(user_id, &filter, &connection) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("Could not get expenses for user {user_id}: {error}");
            return error.into_response();
        }
    };
    drop(connection);

    filter_category_page(Some(&selected_category), &expenses).into_response()
}
