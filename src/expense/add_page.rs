//! The page and endpoint for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    alert::set_flash,
    endpoints,
    html::{self, base, text_input},
    navigation::NavBar,
    timezone::local_date_today,
    user::UserID,
};

use super::store::{Expense, create_expense};

/// The state needed to record an expense.
#[derive(Debug, Clone)]
pub struct AddExpenseState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for storing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AddExpenseState> for Key {
    fn from_ref(state: &AddExpenseState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw form data for a new expense.
///
/// The amount is kept as a string so that a non-numeric value can be rejected
/// with an inline error instead of a low-level deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct AddExpenseData {
    /// The amount of money spent, as entered in the form.
    pub amount: String,
    /// The category of spending.
    pub category: String,
    /// An optional note on what the expense was for.
    #[serde(default)]
    pub description: String,
}

struct FormErrors<'a> {
    amount: Option<&'a str>,
    category: Option<&'a str>,
}

impl FormErrors<'_> {
    fn none() -> Self {
        FormErrors {
            amount: None,
            category: None,
        }
    }
}

fn add_expense_form(
    amount: &str,
    category: &str,
    description: &str,
    errors: FormErrors,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::ADD_EXPENSE)
            hx-swap="outerHTML"
            class="w-full max-w-md space-y-4 md:space-y-6"
        {
            div {
                label for="amount" class=(html::FORM_LABEL_STYLE) { "Amount" }
                input
                    type="number"
                    name="amount"
                    id="amount"
                    step="0.01"
                    class=(html::FORM_TEXT_INPUT_STYLE)
                    value=(amount)
                    required;

                @if let Some(error_message) = errors.amount {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            (text_input("category", "Category", "text", category, errors.category))
            (text_input("description", "Description", "text", description, None))

            button type="submit" class=(html::BUTTON_PRIMARY_STYLE) { "Add expense" }
        }
    }
}

/// Display the page for recording an expense.
pub async fn get_add_expense_page() -> Markup {
    let content = html! {
        (NavBar::new(endpoints::ADD_EXPENSE).into_html())

        div class=(html::FORM_CONTAINER_STYLE) {
            h1 class="text-2xl font-bold mb-4" { "Add an expense" }

            (add_expense_form("", "", "", FormErrors::none()))
        }
    };

    base("Add expense", &content)
}

/// Handler for recording an expense via the POST method.
///
/// The expense is dated with the current calendar date in the configured
/// timezone. On success, a flash message is set and the client is redirected
/// to the home page. A non-numeric amount or an empty category is rejected
/// by returning the form with an inline error message.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn post_add_expense(
    State(state): State<AddExpenseState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<AddExpenseData>,
) -> Response {
    let amount: f64 = match form.amount.trim().parse() {
        Ok(amount) => amount,
        Err(_) => {
            return add_expense_form(
                &form.amount,
                &form.category,
                &form.description,
                FormErrors {
                    amount: Some("Amount must be a number."),
                    category: None,
                },
            )
            .into_response();
        }
    };

    if form.category.trim().is_empty() {
        return add_expense_form(
            &form.amount,
            &form.category,
            &form.description,
            FormErrors {
                amount: None,
                category: Some("Category must not be empty."),
            },
        )
        .into_response();
    }

    let date = match local_date_today(&state.local_timezone) {
        Ok(date) => date,
        Err(error) => return error.into_response(),
    };

    let description = Some(form.description).filter(|text| !text.trim().is_empty());
    let builder = Expense::build(user_id, date, amount, &form.category).description(description);

    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database lock");

    if let Err(error) = create_expense(builder, &connection) {
        tracing::error!("Could not create expense for user {user_id}: {error}");
        return error.into_response();
    }
    drop(connection);

    let jar = set_flash(jar, "Expense added successfully.");

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::ROOT.to_owned()),
        jar,
    )
        .into_response()
}

#[cfg(test)]
mod add_expense_page_tests {
    use axum::response::IntoResponse;
    use scraper::{Html, Selector};

    use crate::endpoints;

    use super::get_add_expense_page;

    #[tokio::test]
    async fn add_expense_page_displays_form() {
        let response = get_add_expense_page().await.into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();
        let document = Html::parse_document(&text);
        assert!(
            document.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            document.errors
        );

        let form_selector = Selector::parse("form").unwrap();
        let forms = document.select(&form_selector).collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());

        let form = forms.first().unwrap();
        assert_eq!(
            form.value().attr("hx-post"),
            Some(endpoints::ADD_EXPENSE),
            "want form posting to {}",
            endpoints::ADD_EXPENSE
        );

        for (element_type, name) in [
            ("number", "amount"),
            ("text", "category"),
            ("text", "description"),
        ] {
            let selector_string = format!("input[type={element_type}][name={name}]");
            let input_selector = Selector::parse(&selector_string).unwrap();
            assert_eq!(
                form.select(&input_selector).count(),
                1,
                "want 1 {name} input"
            );
        }
    }
}
