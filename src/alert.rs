//! One-shot notices shown to the user after a redirect, e.g. "Expense added."
//!
//! A notice is stored in a private cookie when a handler redirects, and the
//! next page render consumes it: [take_flash] returns the message and a jar
//! that removes the cookie, so each notice is displayed exactly once.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};

pub(crate) const COOKIE_FLASH: &str = "flash";

/// Store `message` so the next page rendered for this client displays it.
///
/// Returns the cookie jar with the flash cookie added. The jar must be
/// included in the response for the cookie to reach the client.
pub fn set_flash(jar: PrivateCookieJar, message: &str) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_FLASH, message.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Take the pending flash message, if any, out of the cookie jar.
///
/// Returns the message and the updated jar. The jar must be included in the
/// response so the removal reaches the client, otherwise the message will be
/// shown again on the next page.
pub fn take_flash(jar: PrivateCookieJar) -> (Option<String>, PrivateCookieJar) {
    match jar.get(COOKIE_FLASH) {
        Some(cookie) => {
            let message = cookie.value_trimmed().to_owned();
            let jar = jar.remove(Cookie::build((COOKIE_FLASH, "")).path("/"));

            (Some(message), jar)
        }
        None => (None, jar),
    }
}

/// A banner for a flash message, rendered at the top of the page content.
///
/// Renders nothing when `message` is `None`.
pub fn flash_banner(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            div
                role="status"
                class="w-full max-w-2xl mb-4 px-4 py-3 rounded border \
                    border-blue-300 bg-blue-50 text-blue-800 \
                    dark:border-blue-800 dark:bg-blue-900/30 dark:text-blue-200"
            {
                (message)
            }
        }
    }
}

#[cfg(test)]
mod flash_tests {
    use axum_extra::extract::PrivateCookieJar;

    use crate::app_state::create_cookie_key;

    use super::{COOKIE_FLASH, set_flash, take_flash};

    fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    #[test]
    fn set_then_take_returns_message() {
        let jar = set_flash(get_jar(), "Expense added.");

        let (message, jar) = take_flash(jar);

        assert_eq!(message.as_deref(), Some("Expense added."));
        assert!(
            jar.get(COOKIE_FLASH).is_none(),
            "flash cookie should be removed after being taken"
        );
    }

    #[test]
    fn take_returns_none_for_empty_jar() {
        let (message, _) = take_flash(get_jar());

        assert_eq!(message, None);
    }
}
