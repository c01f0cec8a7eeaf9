//! Personalised financial tips from an external AI service.

mod api;
mod client;
mod models;
mod page;

pub use api::{AiTipsState, get_ai_tips_health, post_ai_tips};
pub use client::{AiServiceClient, DEFAULT_AI_SERVICE_TIMEOUT};
pub use models::{
    ProfileInput, RiskTolerance, TipType, TipsRequest, TipsRequestInput, TipsResponse,
};
pub use page::{get_ai_tips_page, post_ai_tips_form};
