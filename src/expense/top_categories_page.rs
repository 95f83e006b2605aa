//! The page showing per-category spending totals ranked descending.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState,
    endpoints,
    html::{self, base, format_currency},
    navigation::NavBar,
    user::UserID,
};

use super::{aggregate::category_totals, filter::ExpenseFilter, store::get_expenses};

/// The state needed for the top categories page.
#[derive(Debug, Clone)]
pub struct TopCategoriesState {
    /// The database connection for listing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TopCategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the current user's spending per category, highest total first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn get_top_categories_page(
    State(state): State<TopCategoriesState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database lock");

    let expenses = match get_expenses(user_id, &ExpenseFilter::All, &connection) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("Could not get expenses for user {user_id}: {error}");
            return error.into_response();
        }
    };
    drop(connection);

    let totals = category_totals(&expenses);

    let content = html! {
        (NavBar::new(endpoints::TOP_CATEGORIES).into_html())

        div class=(html::PAGE_CONTAINER_STYLE) {
            h1 class="text-2xl font-bold mb-4" { "Top spending categories" }

            table class=(html::TABLE_STYLE) {
                thead class=(html::TABLE_HEADER_STYLE) {
                    tr {
                        th class=(html::TABLE_CELL_STYLE) { "Rank" }
                        th class=(html::TABLE_CELL_STYLE) { "Category" }
                        th class=(html::TABLE_CELL_STYLE) { "Total" }
                    }
                }

                tbody {
                    @if totals.is_empty() {
                        tr class=(html::TABLE_ROW_STYLE) {
                            td class=(html::TABLE_CELL_STYLE) colspan="3" data-empty-state="true" {
                                "No expenses to summarize."
                            }
                        }
                    }

                    @for (rank, (category, total)) in totals.iter().enumerate() {
                        tr class=(html::TABLE_ROW_STYLE) data-category-row="true" {
                            td class=(html::TABLE_CELL_STYLE) { (rank + 1) }
                            td class=(html::TABLE_CELL_STYLE) { (category) }
                            td class=(html::TABLE_CELL_STYLE) { (format_currency(*total)) }
                        }
                    }
                }
            }
        }
    };

    base("Top categories", &content).into_response()
}
