//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{create_account_endpoint, get_account_page, get_account_summary},
    ai_tips::{get_ai_tips_health, get_ai_tips_page, post_ai_tips, post_ai_tips_form},
    auth::{auth_guard, auth_guard_api, auth_guard_hx, get_log_in_page, get_log_out, post_log_in},
    dashboard::get_dashboard_page,
    endpoints,
    error_page::{get_404_not_found, get_internal_server_error_page},
    shield::shield_guard,
    transaction::create_transaction_endpoint,
};

/// Return a router with all the app's routes.
///
/// Every route except the static files goes through the shield first, then
/// the auth guard that fits how the route is called.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::AI_TIPS_HEALTH_API, get(get_ai_tips_health))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let page_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::ACCOUNT_VIEW, get(get_account_page))
        .route(endpoints::AI_TIPS_VIEW, get(get_ai_tips_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // HTMX form posts need the HX-Redirect header for auth redirects to work.
    let hx_routes = Router::new()
        .route(endpoints::AI_TIPS_VIEW, post(post_ai_tips_form))
        .route(endpoints::ACCOUNTS_API, post(create_account_endpoint))
        .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    let json_routes = Router::new()
        .route(endpoints::ACCOUNT_SUMMARY_API, get(get_account_summary))
        .route(endpoints::AI_TIPS_API, post(post_ai_tips))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_guard_api,
        ));

    page_routes
        .merge(hx_routes)
        .merge(json_routes)
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), shield_guard))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
