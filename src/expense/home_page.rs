//! The home page: the current user's expenses with optional month and date
//! filters and a running total.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    alert::{flash_banner, take_flash},
    endpoints,
    html::{self, base, format_currency},
    navigation::NavBar,
    user::UserID,
};

use super::{
    aggregate::sum_amounts,
    filter::ExpenseFilter,
    store::get_expenses,
    table::expense_table,
};

/// The state needed for the home page.
#[derive(Debug, Clone)]
pub struct HomePageState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for listing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HomePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<HomePageState> for Key {
    fn from_ref(state: &HomePageState) -> Self {
        state.cookie_key.clone()
    }
}

/// The home page's optional filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// A month of the form YYYY-MM to narrow the listing to.
    pub month: Option<String>,
    /// A date of the form YYYY-MM-DD to narrow the listing to.
    pub date: Option<String>,
}

fn filter_form(month: &str, date: &str) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::ROOT)
            class="w-full max-w-2xl flex flex-wrap items-end gap-4 mb-6"
        {
            div {
                label for="month" class=(html::FORM_LABEL_STYLE) { "Month" }
                input
                    type="month"
                    name="month"
                    id="month"
                    class=(html::FORM_TEXT_INPUT_STYLE)
                    value=(month);
            }

            div {
                label for="date" class=(html::FORM_LABEL_STYLE) { "Date" }
                input
                    type="date"
                    name="date"
                    id="date"
                    class=(html::FORM_TEXT_INPUT_STYLE)
                    value=(date);
            }

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                    hover:dark:bg-blue-700 text-white rounded"
            {
                "Filter"
            }

            a href=(endpoints::ROOT) class=(html::LINK_STYLE) { "Clear" }
        }
    }
}

/// Render the current user's expenses with an optional month or date filter.
///
/// A malformed filter parameter does not abort the request: the error is
/// reported in a banner and the unfiltered listing is shown instead.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn get_home_page(
    State(state): State<HomePageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<HomeQuery>,
    jar: PrivateCookieJar,
) -> Response {
    let (flash, jar) = take_flash(jar);

    let (filter, filter_error) =
        match ExpenseFilter::from_query(query.month.as_deref(), query.date.as_deref()) {
            Ok(filter) => (filter, None),
            Err(error) => (ExpenseFilter::All, Some(error.to_string())),
        };

    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database lock");

    let expenses = match get_expenses(user_id, &filter, &connection) {
        Ok(expenses) => expenses,
        Err(error) => {
            tracing::error!("Could not get expenses for user {user_id}: {error}");
            return error.into_response();
        }
    };
    drop(connection);

    let total = sum_amounts(&expenses);

    let content = html! {
        (NavBar::new(endpoints::ROOT).into_html())

        div class=(html::PAGE_CONTAINER_STYLE) {
            (flash_banner(flash.as_deref()))
            (flash_banner(filter_error.as_deref()))

            h1 class="text-2xl font-bold mb-4" { "Your expenses" }

            (filter_form(
                query.month.as_deref().unwrap_or(""),
                query.date.as_deref().unwrap_or(""),
            ))

            (expense_table(&expenses, false))

            p class="w-full max-w-2xl mt-4 text-lg font-semibold text-right" {
                "Total: " (format_currency(total))
            }
        }
    };

    (jar, base("Home", &content)).into_response()
}
