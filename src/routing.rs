//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{
        auth_guard, get_log_in_page, get_log_out, get_sign_up_page, post_log_in, post_sign_up,
    },
    endpoints,
    expense::{
        delete_expense_endpoint, get_add_expense_page, get_expenses_view_page,
        get_filter_category_page, get_home_page, get_top_categories_page, post_add_expense,
        post_filter_category,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::SIGN_UP, get(get_sign_up_page).post(post_sign_up))
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in));

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::ADD_EXPENSE,
            get(get_add_expense_page).post(post_add_expense),
        )
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_view_page))
        .route(endpoints::DELETE_EXPENSE, post(delete_expense_endpoint))
        .route(endpoints::TOP_CATEGORIES, get(get_top_categories_page))
        .route(
            endpoints::FILTER_CATEGORY,
            get(get_filter_category_page).post(post_filter_category),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints, routing::build_router};

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "foobar", "Etc/UTC")
            .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = get_test_server();

        let response = server.get(endpoints::COFFEE).await;

        response.assert_status(axum::http::StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_route_returns_404_page() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn protected_routes_redirect_anonymous_clients_to_log_in() {
        let server = get_test_server();

        for endpoint in [
            endpoints::ROOT,
            endpoints::ADD_EXPENSE,
            endpoints::EXPENSES_VIEW,
            endpoints::TOP_CATEGORIES,
            endpoints::FILTER_CATEGORY,
        ] {
            let response = server.get(endpoint).await;

            response.assert_status_see_other();
            assert_eq!(
                response.header("location"),
                endpoints::LOG_IN,
                "want {endpoint} to redirect to the log-in page"
            );
        }
    }
}
