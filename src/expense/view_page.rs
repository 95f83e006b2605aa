//! The page listing all of the current user's expenses with delete buttons.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState,
    alert::{flash_banner, take_flash},
    endpoints,
    html::{self, base},
    navigation::NavBar,
    user::UserID,
};

use super::{filter::ExpenseFilter, store::get_expenses, table::expense_table};

/// The state needed for the expenses listing page.
#[derive(Debug, Clone)]
pub struct ExpensesViewState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for listing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<ExpensesViewState> for Key {
    fn from_ref(state: &ExpensesViewState) -> Self {
        state.cookie_key.clone()
    }
}

/// Render all of the current user's expenses, newest first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn get_expenses_view_page(
    State(state): State<ExpensesViewState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let (flash, jar) = take_flash(jar);

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

    let content = html! {
        (NavBar::new(endpoints::EXPENSES_VIEW).into_html())

        div class=(html::PAGE_CONTAINER_STYLE) {
            (flash_banner(flash.as_deref()))

            h1 class="text-2xl font-bold mb-4" { "All expenses" }

            (expense_table(&expenses, true))
        }
    };

    (jar, base("Expenses", &content)).into_response()
}
