//! HTTP client for the external AI tips service.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    Error,
    ai_tips::{TipsRequest, TipsResponse},
};

/// The default time to wait for the AI service to respond.
pub const DEFAULT_AI_SERVICE_TIMEOUT: Duration = Duration::from_secs(30);

/// The error body returned by the AI service.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// A client for the AI service at a fixed base URL.
#[derive(Debug, Clone)]
pub struct AiServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl AiServiceClient {
    /// Create a client for the service at `base_url` whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [Error::AiService] if the HTTP client could not be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The URL of the service this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the AI service for tips tailored to `request`.
    ///
    /// # Errors
    ///
    /// Returns [Error::AiService] if the service cannot be reached, responds
    /// with an error status, or sends an unexpected body. For error statuses
    /// the service's `detail` message is used when it has one.
    pub async fn generate_tips(&self, request: &TipsRequest) -> Result<TipsResponse, Error> {
        let response = self
            .client
            .post(format!("{}/generate-tips", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .map(|detail| match detail {
                    Value::String(message) => message,
                    other => other.to_string(),
                })
                .unwrap_or_else(|| format!("AI service error ({status})"));

            return Err(Error::AiService(detail));
        }

        Ok(response.json().await?)
    }

    /// Fetch the AI service's health report.
    ///
    /// # Errors
    ///
    /// Returns [Error::AiService] if the service cannot be reached or reports
    /// an error status.
    pub async fn health(&self) -> Result<Value, Error> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::AiService(format!(
                "AI service health check failed ({status})"
            )));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
pub(crate) mod test_service {
    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind test listener");
        let address = listener
            .local_addr()
            .expect("Could not get test listener address");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test AI service stopped");
        });

        format!("http://{address}")
    }

    pub fn tips_json() -> Value {
        json!({
            "tips": ["Cook at home", "Cancel unused subscriptions", "Automate savings"],
            "priority_level": "High",
            "estimated_impact": "Save ₹5,000 a month",
            "action_items": ["Move ₹5,000 to savings on payday", "Review bank statements"],
            "personalized_message": "You are closer than you think!",
        })
    }

    /// A stand-in AI service that echoes the tip type it received in the
    /// personalised message.
    pub fn healthy_service() -> Router {
        Router::new()
            .route(
                "/generate-tips",
                post(|Json(body): Json<Value>| async move {
                    let mut tips = tips_json();
                    tips["personalized_message"] =
                        json!(format!("tip type: {}", body["tip_type"].as_str().unwrap_or("?")));
                    Json(tips)
                }),
            )
            .route(
                "/health",
                get(|| async { Json(json!({ "status": "healthy" })) }),
            )
    }

    pub fn failing_service() -> Router {
        Router::new()
            .route(
                "/generate-tips",
                post(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "detail": "Gemini quota exceeded" })),
                    )
                }),
            )
            .route(
                "/health",
                get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
            )
    }
}
