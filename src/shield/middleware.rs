//! Middleware that blocks attack patterns and automated clients before any other handling.

use axum::{
    Json,
    extract::{FromRef, Request, State},
    http::{StatusCode, header::USER_AGENT},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::{
    AppState,
    shield::{
        attack::{AttackRule, detect_attack},
        bot::classify_user_agent,
    },
};

/// Whether the shield blocks requests or only logs what it would block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ShieldMode {
    /// Deny matching requests with 403 Forbidden.
    #[default]
    Live,
    /// Log matching requests and let them through.
    DryRun,
}

/// The state needed for the shield middleware.
#[derive(Debug, Clone, Copy)]
pub struct ShieldState {
    pub mode: ShieldMode,
}

impl FromRef<AppState> for ShieldState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            mode: state.shield_mode,
        }
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DenyReason {
    Shield { rule: AttackRule },
    Bot { agent: Option<String> },
}

const STATIC_EXTENSIONS: [&str; 21] = [
    "html",
    "htm",
    "css",
    "js",
    "jpg",
    "jpeg",
    "webp",
    "png",
    "gif",
    "svg",
    "ttf",
    "woff",
    "woff2",
    "ico",
    "csv",
    "doc",
    "docx",
    "xls",
    "xlsx",
    "zip",
    "webmanifest",
];

/// Static-looking paths skip the shield, API paths never do.
pub fn is_shielded(path: &str) -> bool {
    if path.starts_with("/api") {
        return true;
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((_, extension)) => !STATIC_EXTENSIONS.contains(&extension.to_lowercase().as_str()),
        None => true,
    }
}

/// Decide whether `request` should be denied.
///
/// Attack patterns are checked before the client's user agent.
pub fn inspect_request(request: &Request) -> Option<DenyReason> {
    let uri = request.uri();
    if let Some(rule) = detect_attack(uri.path(), uri.query()) {
        return Some(DenyReason::Shield { rule });
    }

    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .map(|header| String::from_utf8_lossy(header.as_bytes()).into_owned());

    let is_allowed = user_agent
        .as_deref()
        .is_some_and(|user_agent| classify_user_agent(user_agent).is_allowed());

    if is_allowed {
        None
    } else {
        Some(DenyReason::Bot { agent: user_agent })
    }
}

/// Middleware that denies requests matching an attack pattern or coming from
/// automated clients.
///
/// In [ShieldMode::DryRun] the decision is only logged.
pub async fn shield_guard(
    State(state): State<ShieldState>,
    request: Request,
    next: Next,
) -> Response {
    if !is_shielded(request.uri().path()) {
        return next.run(request).await;
    }

    let Some(reason) = inspect_request(&request) else {
        return next.run(request).await;
    };

    match state.mode {
        ShieldMode::Live => {
            tracing::warn!(
                "Denied {} {}: {reason:?}",
                request.method(),
                request.uri()
            );

            (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Forbidden", "reason": reason })),
            )
                .into_response()
        }
        ShieldMode::DryRun => {
            tracing::info!(
                "Dry run, would deny {} {}: {reason:?}",
                request.method(),
                request.uri()
            );

            next.run(request).await
        }
    }
}

#[cfg(test)]
mod shield_tests {
    use axum::{Router, body::Body, extract::Request, http::StatusCode, middleware, routing::get};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::shield::attack::AttackRule;

    use super::{DenyReason, ShieldMode, ShieldState, inspect_request, is_shielded, shield_guard};

    const BROWSER: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

    fn get_test_server(mode: ShieldMode) -> TestServer {
        let app = Router::new()
            .route("/dashboard", get(|| async { "dashboard" }))
            .route("/api/data.json", get(|| async { "data" }))
            .route("/static/main.css", get(|| async { "css" }))
            .layer(middleware::from_fn_with_state(
                ShieldState { mode },
                shield_guard,
            ));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[test]
    fn static_files_are_not_shielded() {
        assert!(!is_shielded("/static/main.css"));
        assert!(!is_shielded("/static/echarts.6.0.0.min.js"));
        assert!(!is_shielded("/favicon.ico"));
        assert!(is_shielded("/dashboard"));
        assert!(is_shielded("/accounts/1"));
        assert!(is_shielded("/data.json"));
        assert!(is_shielded("/api/export.csv"));
    }

    #[test]
    fn missing_user_agent_is_denied() {
        let request = Request::builder()
            .uri("/dashboard")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            inspect_request(&request),
            Some(DenyReason::Bot { agent: None })
        );
    }

    #[test]
    fn attack_is_reported_before_bot() {
        let request = Request::builder()
            .uri("/dashboard?range=%3Cscript%3E")
            .header("User-Agent", "curl/8.5.0")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            inspect_request(&request),
            Some(DenyReason::Shield {
                rule: AttackRule::ScriptInjection
            })
        );
    }

    #[test]
    fn deny_reason_serializes_with_type_tag() {
        let reason = DenyReason::Bot {
            agent: Some("curl/8.5.0".to_owned()),
        };

        assert_eq!(
            serde_json::to_value(reason).unwrap(),
            json!({ "type": "bot", "agent": "curl/8.5.0" })
        );
    }

    #[tokio::test]
    async fn browser_is_allowed() {
        let server = get_test_server(ShieldMode::Live);

        server
            .get("/dashboard")
            .add_header("User-Agent", BROWSER)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn search_engine_is_allowed() {
        let server = get_test_server(ShieldMode::Live);

        server
            .get("/dashboard")
            .add_header(
                "User-Agent",
                "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
            )
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn automated_client_is_forbidden() {
        let server = get_test_server(ShieldMode::Live);

        let response = server
            .get("/api/data.json")
            .add_header("User-Agent", "python-requests/2.31.0")
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        response.assert_json(&json!({
            "error": "Forbidden",
            "reason": { "type": "bot", "agent": "python-requests/2.31.0" }
        }));
    }

    #[tokio::test]
    async fn sql_injection_is_forbidden() {
        let server = get_test_server(ShieldMode::Live);

        let response = server
            .get("/dashboard")
            .add_query_param("range", "1M' OR '1'='1")
            .add_header("User-Agent", BROWSER)
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        response.assert_json(&json!({
            "error": "Forbidden",
            "reason": { "type": "shield", "rule": "sql_injection" }
        }));
    }

    #[tokio::test]
    async fn static_assets_skip_bot_detection() {
        let server = get_test_server(ShieldMode::Live);

        server
            .get("/static/main.css")
            .add_header("User-Agent", "curl/8.5.0")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn dry_run_lets_denied_requests_through() {
        let server = get_test_server(ShieldMode::DryRun);

        server
            .get("/dashboard")
            .add_header("User-Agent", "curl/8.5.0")
            .await
            .assert_status_ok();
    }
}
