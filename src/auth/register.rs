//! The sign-up page and the endpoint that creates new accounts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::set_flash,
    auth::PasswordHash,
    endpoints,
    html::{self, auth_card, base, text_input},
    user::create_user,
};

/// The state needed to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for storing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegisterState> for Key {
    fn from_ref(state: &RegisterState) -> Self {
        state.cookie_key.clone()
    }
}

fn sign_up_form(username: &str, username_error: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::SIGN_UP)
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            (text_input("username", "Username", "text", username, username_error))
            (text_input("password", "Password", "password", "", None))

            button type="submit" class=(html::BUTTON_PRIMARY_STYLE) { "Sign up" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Already have an account? "
                a href=(endpoints::LOG_IN) class=(html::LINK_STYLE) { "Log in" }
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Markup {
    base(
        "Sign up",
        &auth_card("Create an account", &sign_up_form("", None)),
    )
}

/// The raw data entered by the user in the sign-up form.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpData {
    /// The username to register. Must not be taken by another account.
    pub username: String,
    /// The plaintext password, hashed before it is stored.
    pub password: String,
}

/// Handler for sign-up requests via the POST method.
///
/// On success, a flash message is set and the client is redirected to the
/// log-in page. If the username is empty or already taken, the form is
/// returned with an error message explaining the problem.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn post_sign_up(
    State(state): State<RegisterState>,
    jar: PrivateCookieJar,
    Form(sign_up_data): Form<SignUpData>,
) -> Response {
    if sign_up_data.username.trim().is_empty() {
        return sign_up_form("", Some("Username must not be empty.")).into_response();
    }

    let password_hash = match PasswordHash::new(&sign_up_data.password, PasswordHash::DEFAULT_COST)
    {
        Ok(password_hash) => password_hash,
        Err(error) => {
            tracing::error!("Could not hash password: {error}");
            return html::render_internal_server_error();
        }
    };

    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database lock");

    match create_user(&sign_up_data.username, password_hash, &connection) {
        Ok(_) => {
            let jar = set_flash(jar, "Signup successful! Please log in.");

            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::LOG_IN.to_owned()),
                jar,
            )
                .into_response()
        }
        Err(Error::DuplicateUsername) => {
            sign_up_form(&sign_up_data.username, Some("Username already exists.")).into_response()
        }
        Err(error) => {
            tracing::error!("Could not create user: {error}");
            html::render_internal_server_error()
        }
    }
}


#[cfg(test)]
mod sign_up_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::{Form, PrivateCookieJar};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{
        app_state::create_cookie_key,
        endpoints,
        user::{create_user_table, get_user_by_username},
    };

    use super::{RegisterState, SignUpData, post_sign_up};

    fn get_test_state() -> RegisterState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        RegisterState {
            cookie_key: create_cookie_key("foobar"),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_jar(state: &RegisterState) -> PrivateCookieJar {
        PrivateCookieJar::new(state.cookie_key.clone())
    }

    #[tokio::test]
    async fn sign_up_creates_user_and_redirects_to_log_in() {
        let state = get_test_state();
        let form = SignUpData {
            username: "alice".to_owned(),
            password: "pw1".to_owned(),
        };

        let response = post_sign_up(State(state.clone()), get_jar(&state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::LOG_IN
        );

        let connection = state.db_connection.lock().unwrap();
        let user = get_user_by_username("alice", &connection).expect("User should exist");
        assert_eq!(user.username, "alice");
        assert!(
            user.password_hash.verify("pw1").unwrap(),
            "stored hash should verify the sign-up password"
        );
    }

    #[tokio::test]
    async fn duplicate_username_shows_error_and_creates_no_record() {
        let state = get_test_state();
        let form = SignUpData {
            username: "alice".to_owned(),
            password: "pw1".to_owned(),
        };
        post_sign_up(State(state.clone()), get_jar(&state), Form(form.clone())).await;

        let response = post_sign_up(State(state.clone()), get_jar(&state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();
        assert!(
            text.contains("Username already exists."),
            "want duplicate username error in body, got {text}"
        );

        let connection = state.db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row(
                "SELECT COUNT(id) FROM user WHERE username = 'alice'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1, "want 1 user record, got {count}");
    }

    #[tokio::test]
    async fn empty_username_is_rejected() {
        let state = get_test_state();
        let form = SignUpData {
            username: "   ".to_owned(),
            password: "pw1".to_owned(),
        };

        let response = post_sign_up(State(state.clone()), get_jar(&state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();
        assert!(
            text.contains("Username must not be empty."),
            "want empty username error in body, got {text}"
        );
    }
}
