//! The log-in page and the endpoint that starts an authenticated session.
//!
//! The rest of the auth module handles the lower level password and cookie
//! logic.

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
use time::Duration;

use crate::{
    AppState, Error,
    alert::{flash_banner, set_flash, take_flash},
    auth::{DEFAULT_COOKIE_DURATION, set_auth_cookie},
    endpoints,
    html::{self, auth_card, base, text_input},
    user::{User, get_user_by_username},
};

/// The error message shown when the username or password is wrong.
///
/// The same message is used for both cases so that the response does not
/// reveal which usernames are registered.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid username or password.";

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl LogInState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(cookie_secret: &str, db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            cookie_key: crate::app_state::create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection,
        }
    }
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

fn log_in_form(username: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN)
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            (text_input("username", "Username", "text", username, None))
            (text_input("password", "Password", "password", "", error_message))

            button type="submit" class=(html::BUTTON_PRIMARY_STYLE) { "Log in" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Need an account? "
                a href=(endpoints::SIGN_UP) class=(html::LINK_STYLE) { "Sign up" }
            }
        }
    }
}

/// Display the log-in page.
///
/// A pending flash message, e.g. the sign-up success notice, is consumed and
/// displayed above the form.
pub async fn get_log_in_page(jar: PrivateCookieJar) -> Response {
    let (flash, jar) = take_flash(jar);

    let content = html! {
        div class="flex flex-col items-center pt-6" {
            (flash_banner(flash.as_deref()))
        }
        (auth_card("Log in to your account", &log_in_form("", None)))
    };

    (jar, base("Log in", &content)).into_response()
}

/// The raw data entered by the user in the log-in form.
///
/// The username and password are stored as plain strings. There is no need
/// for validation here since they will be compared against the records in the
/// database.
#[derive(Debug, Clone, Deserialize)]
pub struct LogInData {
    /// Username entered during log-in.
    pub username: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the home page. Otherwise, the form is returned with an error
/// message explaining the problem.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(log_in_data): Form<LogInData>,
) -> Response {
    let user: User = match get_user_by_username(
        &log_in_data.username,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    ) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            return log_in_form(&log_in_data.username, Some(INVALID_CREDENTIALS_ERROR_MSG))
                .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while looking up user: {error}");
            return html::render_internal_server_error();
        }
    };

    let is_password_valid = match user.password_hash.verify(&log_in_data.password) {
        Ok(is_password_valid) => is_password_valid,
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return html::render_internal_server_error();
        }
    };

    if !is_password_valid {
        return log_in_form(&log_in_data.username, Some(INVALID_CREDENTIALS_ERROR_MSG))
            .into_response();
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration);
    let jar = set_flash(jar, "Logged in successfully!");

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::ROOT.to_owned()),
        jar,
    )
        .into_response()
}


#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use axum_extra::extract::{Form, PrivateCookieJar};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{
        auth::{COOKIE_USER_ID, PasswordHash},
        endpoints,
        user::{User, create_user, create_user_table},
    };

    use super::{INVALID_CREDENTIALS_ERROR_MSG, LogInData, LogInState, post_log_in};

    fn get_test_state(test_user: Option<(&str, &str)>) -> LogInState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        if let Some((username, password)) = test_user {
            let password_hash =
                PasswordHash::new(password, 4).expect("Could not hash test password");
            let _: User = create_user(username, password_hash, &connection)
                .expect("Could not create test user");
        }

        LogInState::new("foobar", Arc::new(Mutex::new(connection)))
    }

    async fn new_log_in_request(state: LogInState, log_in_data: LogInData) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_log_in(State(state), jar, Form(log_in_data)).await
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let state = get_test_state(Some(("alice", "correcthorse")));

        let response = new_log_in_request(
            state,
            LogInData {
                username: "alice".to_owned(),
                password: "correcthorse".to_owned(),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::ROOT
        );
        assert_sets_auth_cookie(&response);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_username() {
        let state = get_test_state(None);

        let response = new_log_in_request(
            state,
            LogInData {
                username: "nobody".to_owned(),
                password: "whatever".to_owned(),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, INVALID_CREDENTIALS_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let state = get_test_state(Some(("alice", "correcthorse")));

        let response = new_log_in_request(
            state,
            LogInData {
                username: "alice".to_owned(),
                password: "wrongpassword".to_owned(),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_body_contains_message(response, INVALID_CREDENTIALS_ERROR_MSG).await;
    }

    #[track_caller]
    fn assert_sets_auth_cookie(response: &Response<Body>) {
        use axum::http::header::SET_COOKIE;

        let found = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .any(|header| {
                header
                    .to_str()
                    .map(|cookie| cookie.starts_with(COOKIE_USER_ID))
                    .unwrap_or(false)
            });

        assert!(found, "want a set-cookie header for '{COOKIE_USER_ID}'");
    }

    async fn assert_body_contains_message(response: Response<Body>, message: &str) {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        assert!(
            text.contains(message),
            "response body should contain the text '{message}' but got {text}"
        );
    }
}
