//! Authentication middleware that validates the session cookie and redirects
//! anonymous clients to the log-in page.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::{HX_REQUEST, HxRedirect};

use crate::{auth::cookie::get_user_id_from_auth_cookie, endpoints};

/// The state needed for the auth middleware in tests.
///
/// In production the middleware runs with the full [crate::AppState]; this
/// struct lets tests build a router with just the cookie key.
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl axum::extract::FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie.
///
/// The user ID is placed into the request and then the request executed
/// normally if the cookie is valid, otherwise a redirect to the log-in page
/// is returned. Requests made by HTMX receive the redirect via the
/// `HX-Redirect` header instead of a `Location` header so that the full page
/// is reloaded rather than swapping the log-in page into the target element.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserID>` to receive the user ID.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key`
/// for decrypting and verifying the cookie contents.
pub async fn auth_guard(jar: PrivateCookieJar, mut request: Request, next: Next) -> Response {
    let user_id = match get_user_id_from_auth_cookie(&jar) {
        Ok(user_id) => user_id,
        Err(_) => {
            return if request.headers().contains_key(HX_REQUEST) {
                (
                    StatusCode::SEE_OTHER,
                    HxRedirect(endpoints::LOG_IN.to_owned()),
                    (),
                )
                    .into_response()
            } else {
                Redirect::to(endpoints::LOG_IN).into_response()
            };
        }
    };

    request.extensions_mut().insert(user_id);

    next.run(request).await
}
