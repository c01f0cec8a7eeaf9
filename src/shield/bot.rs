//! Classify clients by their `User-Agent` header.

use serde::Serialize;

/// The kind of client that sent a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BotCategory {
    SearchEngine,
    Monitor,
    /// Go's default HTTP client, used by webhook and job runners.
    GoHttp,
    /// Scripts, scrapers and headless browsers.
    Automated,
    Human,
}

impl BotCategory {
    /// Whether requests from this kind of client are let through.
    pub fn is_allowed(self) -> bool {
        !matches!(self, BotCategory::Automated)
    }
}

const SEARCH_ENGINES: [&str; 6] = [
    "googlebot",
    "bingbot",
    "duckduckbot",
    "applebot",
    "yandexbot",
    "baiduspider",
];

const MONITORS: [&str; 5] = [
    "uptimerobot",
    "pingdom",
    "statuscake",
    "datadog",
    "better uptime",
];

const AUTOMATED: [&str; 14] = [
    "curl/",
    "wget/",
    "python-requests",
    "python-urllib",
    "httpie",
    "scrapy",
    "headlesschrome",
    "phantomjs",
    "selenium",
    "puppeteer",
    "playwright",
    "bot",
    "spider",
    "crawler",
];

/// Classify a `User-Agent` header value.
///
/// Known search engines and monitors are checked before the generic
/// "bot"/"spider" markers, since their agents contain those words too.
pub fn classify_user_agent(user_agent: &str) -> BotCategory {
    let user_agent = user_agent.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|needle| user_agent.contains(needle));

    if contains_any(&SEARCH_ENGINES) {
        BotCategory::SearchEngine
    } else if contains_any(&MONITORS) {
        BotCategory::Monitor
    } else if user_agent.starts_with("go-http-client") {
        BotCategory::GoHttp
    } else if contains_any(&AUTOMATED) || user_agent.trim().is_empty() {
        BotCategory::Automated
    } else {
        BotCategory::Human
    }
}
