//! Log-out route handler that ends the session and redirects to the log-in
//! page.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    alert::set_flash,
    auth::cookie::invalidate_auth_cookie,
    endpoints,
};

/// Invalidate the auth cookie and redirect the client to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = set_flash(invalidate_auth_cookie(jar), "Logged out successfully.");

    (jar, Redirect::to(endpoints::LOG_IN)).into_response()
}
