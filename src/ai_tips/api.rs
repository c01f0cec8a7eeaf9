//! JSON endpoints that proxy the AI tips service.

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    AppState, Error,
    ai_tips::{AiServiceClient, TipsRequest, TipsRequestInput, TipsResponse},
};

/// The state needed to talk to the AI service.
#[derive(Debug, Clone)]
pub struct AiTipsState {
    pub ai_service: AiServiceClient,
}

impl FromRef<AppState> for AiTipsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ai_service: state.ai_service.clone(),
        }
    }
}

/// Validate `input` and ask the AI service for tips.
///
/// Shared by the JSON API and the HTML form.
pub(crate) async fn request_tips(
    ai_service: &AiServiceClient,
    input: TipsRequestInput,
) -> Result<TipsResponse, Error> {
    let request = TipsRequest::try_from(input)?;

    let response = ai_service
        .generate_tips(&request)
        .await
        .inspect_err(|error| tracing::error!("AI tips generation error: {error}"))?;

    tracing::info!(
        "AI tips generated: tip_type={}, tips_count={}, priority={}",
        request.tip_type.as_str(),
        response.tips.len(),
        response.priority_level
    );

    Ok(response)
}

/// Generate tips for the financial profile in the request body.
pub async fn post_ai_tips(
    State(state): State<AiTipsState>,
    Json(input): Json<TipsRequestInput>,
) -> Response {
    match request_tips(&state.ai_service, input).await {
        Ok(tips) => Json(tips).into_response(),
        Err(Error::MissingProfileInformation) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing required profile information" })),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to generate AI tips" })),
        )
            .into_response(),
    }
}

/// Pass through the AI service's health report.
pub async fn get_ai_tips_health(State(state): State<AiTipsState>) -> Response {
    match state.ai_service.health().await {
        Ok(health) => Json(health).into_response(),
        Err(error) => {
            tracing::error!("AI service health check error: {error}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "AI service unavailable" })),
            )
                .into_response()
        }
    }
}
