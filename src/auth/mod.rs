//! User authentication: password hashing, the auth cookie, the middleware
//! that gates expense routes, and the sign-up/log-in/log-out routes.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::auth_guard;
pub use password::PasswordHash;
pub use register::{get_sign_up_page, post_sign_up};

#[cfg(test)]
pub(crate) use cookie::COOKIE_USER_ID;

#[cfg(test)]
pub use middleware::AuthState;
