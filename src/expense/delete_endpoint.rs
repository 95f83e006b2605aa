//! The endpoint for deleting an expense, with an ownership check.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::set_flash,
    endpoints,
    html,
    not_found::get_404_not_found_response,
    user::UserID,
};

use super::store::{ExpenseId, delete_expense};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<DeleteExpenseState> for Key {
    fn from_ref(state: &DeleteExpenseState) -> Self {
        state.cookie_key.clone()
    }
}

/// A route handler for deleting an expense owned by the current user.
///
/// On success, the client is redirected to the expenses listing. Attempting
/// to delete another user's expense redirects home with a message, and an
/// unknown expense ID produces the 404 page.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    jar: PrivateCookieJar,
) -> Response {
    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database lock");
    let result = delete_expense(user_id, expense_id, &connection);
    drop(connection);

    match result {
        Ok(()) => {
            let jar = set_flash(jar, "Expense deleted.");

            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
                jar,
            )
                .into_response()
        }
        Err(Error::Forbidden) => {
            let jar = set_flash(jar, "You are not authorized to delete this expense.");

            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::ROOT.to_owned()),
                jar,
            )
                .into_response()
        }
        Err(Error::NotFound) => get_404_not_found_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            html::render_internal_server_error()
        }
    }
}
