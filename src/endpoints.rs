//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/accounts/{account_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page for logged in users, charts every account.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page that charts a single account.
pub const ACCOUNT_VIEW: &str = "/accounts/{account_id}";
/// The page with the financial profile form for AI tips.
pub const AI_TIPS_VIEW: &str = "/ai-tips";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create an account.
pub const ACCOUNTS_API: &str = "/api/accounts";
/// The route for the JSON chart data of a single account.
pub const ACCOUNT_SUMMARY_API: &str = "/api/accounts/{account_id}/summary";
/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The JSON route that forwards a financial profile to the AI service.
pub const AI_TIPS_API: &str = "/api/ai-tips";
/// The route that reports whether the AI service is reachable.
pub const AI_TIPS_HEALTH_API: &str = "/api/ai-tips/health";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/accounts/{account_id}', '{account_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
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
