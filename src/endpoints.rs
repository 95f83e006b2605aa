//! The application's route URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete/{expense_id}', use
//! [format_endpoint].

/// The home page: the current user's expenses with optional month/date filters.
pub const ROOT: &str = "/";
/// The page and form for creating an account.
pub const SIGN_UP: &str = "/signup";
/// The page and form for logging in.
pub const LOG_IN: &str = "/login";
/// The route that logs out the current user.
pub const LOG_OUT: &str = "/logout";
/// The page and form for adding an expense.
pub const ADD_EXPENSE: &str = "/add";
/// The page listing all of the current user's expenses.
pub const EXPENSES_VIEW: &str = "/view";
/// The route for deleting an expense.
pub const DELETE_EXPENSE: &str = "/delete/{expense_id}";
/// The page showing per-category spending totals.
pub const TOP_CATEGORIES: &str = "/top-category";
/// The page and form for listing expenses in a single category.
pub const FILTER_CATEGORY: &str = "/filter-category";
/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/coffee";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string delimited by braces, for example '{expense_id}' in
/// the endpoint path '/delete/{expense_id}'.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
