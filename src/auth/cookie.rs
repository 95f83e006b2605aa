//! Defines functions for handling the session cookie.
//!
//! The cookie value is the authenticated user's ID. The jar is a
//! `PrivateCookieJar`, so the value is encrypted and signed with the
//! application's cookie key and cannot be read or forged by the client.

use std::num::ParseIntError;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, user::UserID};

pub(crate) const COOKIE_USER_ID: &str = "session_user";

/// The default duration for which the session cookie is valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::days(1);

/// Add the session cookie to the cookie jar, indicating that a user is logged
/// in and authenticated.
///
/// Sets the expiry of the cookie to `duration` from the current time. You can
/// use [DEFAULT_COOKIE_DURATION] for the default duration.
///
/// Returns the cookie jar with the cookie added.
pub fn set_auth_cookie(jar: PrivateCookieJar, user_id: UserID, duration: Duration) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + duration;

    jar.add(
        Cookie::build((COOKIE_USER_ID, user_id.as_i64().to_string()))
            .path("/")
            .expires(expiry)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which deletes the cookie on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_USER_ID, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the authenticated user's ID from the session cookie.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if there is no session cookie in `jar`.
/// - [Error::InvalidCredentials] if the cookie value is not a valid user ID,
///   e.g. the cookie was invalidated by a log-out.
pub fn get_user_id_from_auth_cookie(jar: &PrivateCookieJar) -> Result<UserID, Error> {
    let cookie = jar.get(COOKIE_USER_ID).ok_or(Error::CookieMissing)?;

    extract_user_id(&cookie).map_err(|_| Error::InvalidCredentials)
}

fn extract_user_id(cookie: &Cookie) -> Result<UserID, ParseIntError> {
    let id: i64 = cookie.value_trimmed().parse()?;

    Ok(UserID::new(id))
}
