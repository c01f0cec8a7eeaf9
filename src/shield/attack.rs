//! Pattern checks for common injection and traversal attacks in request URIs.

use percent_encoding::percent_decode_str;
use serde::Serialize;

/// The attack pattern that matched a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackRule {
    PathTraversal,
    SqlInjection,
    ScriptInjection,
}

const PATH_TRAVERSAL: [&str; 2] = ["../", "..\\"];
const SQL_INJECTION: [&str; 4] = ["union select", "' or '1'='1", "or 1=1", "; drop table"];
const SCRIPT_INJECTION: [&str; 2] = ["<script", "javascript:"];

/// Check the path and query of a request for attack patterns.
///
/// Both are percent-decoded, lowercased and have runs of whitespace collapsed
/// before matching so that encoded payloads are caught too.
pub fn detect_attack(path: &str, query: Option<&str>) -> Option<AttackRule> {
    let mut text = decode_path(path);
    if let Some(query) = query {
        text.push('?');
        text.push_str(&decode_query(query));
    }
    let text = normalize(&text);

    let rules = [
        (AttackRule::PathTraversal, PATH_TRAVERSAL.as_slice()),
        (AttackRule::SqlInjection, SQL_INJECTION.as_slice()),
        (AttackRule::ScriptInjection, SCRIPT_INJECTION.as_slice()),
    ];

    rules
        .into_iter()
        .find(|(_, patterns)| patterns.iter().any(|pattern| text.contains(pattern)))
        .map(|(rule, _)| rule)
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Malformed escapes are kept as they are.
fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Decode a query string the way a form handler would, `+` included, and
/// join the pairs back together.
fn decode_query(query: &str) -> String {
    match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
        Ok(pairs) => pairs
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&"),
        Err(error) => {
            tracing::debug!("Could not decode query {query:?}: {error}");
            decode_path(query)
        }
    }
}
