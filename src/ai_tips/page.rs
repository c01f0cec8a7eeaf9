//! The AI tips page: a financial profile form and the tips it produces.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    ai_tips::{
        AiTipsState, ProfileInput, RiskTolerance, TipType, TipsRequestInput, TipsResponse,
        api::request_tips,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
};

/// Display the form for requesting AI tips.
pub async fn get_ai_tips_page() -> Response {
    let nav_bar = NavBar::new(endpoints::AI_TIPS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4 self-start" { "AI-Powered Financial Tips" }

            div class="w-full grid grid-cols-1 lg:grid-cols-2 gap-8"
            {
                div class=(FORM_CONTAINER_STYLE)
                {
                    div class="p-6 space-y-4 sm:p-8" { (tips_form()) }
                }

                section id="tips-result" aria-live="polite" {}
            }
        }
    };

    base("AI Tips", &[], &content).into_response()
}

fn number_input(name: &str, label: &str, placeholder: &str, required: bool) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                name=(name)
                id=(name)
                type="number"
                step="any"
                min="0"
                placeholder=(placeholder)
                required[required]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn tips_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::AI_TIPS_VIEW)
            hx-target="#tips-result"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4"
        {
            div class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                (number_input("monthly_income", "Monthly Income", "Enter monthly income", true))
                (number_input("monthly_expenses", "Monthly Expenses", "Enter monthly expenses", true))
                (number_input("savings_goal", "Savings Goal", "Monthly savings goal", false))
                (number_input("current_savings", "Current Savings", "Current savings amount", false))
                (number_input("debt_amount", "Debt Amount", "Total debt amount", false))
                (number_input("age", "Age", "Your age", false))

                div
                {
                    label for="tip_type" class=(FORM_LABEL_STYLE) { "Tip Type" }

                    select name="tip_type" id="tip_type" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for tip_type in TipType::ALL {
                            option
                                value=(tip_type.as_str())
                                selected[tip_type == TipType::default()]
                            {
                                (tip_type.label())
                            }
                        }
                    }
                }

                div
                {
                    label for="risk_tolerance" class=(FORM_LABEL_STYLE) { "Risk Tolerance" }

                    select name="risk_tolerance" id="risk_tolerance" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for risk_tolerance in RiskTolerance::ALL {
                            option
                                value=(risk_tolerance.as_str())
                                selected[risk_tolerance == RiskTolerance::default()]
                            {
                                (risk_tolerance.label())
                            }
                        }
                    }
                }
            }

            div
            {
                label for="financial_goals" class=(FORM_LABEL_STYLE) { "Financial Goals" }

                input
                    name="financial_goals"
                    id="financial_goals"
                    type="text"
                    placeholder="Buy a house, retire early"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="context" class=(FORM_LABEL_STYLE) { "Additional Context (Optional)" }

                textarea
                    name="context"
                    id="context"
                    rows="3"
                    placeholder="Any specific financial situation or question?"
                    class=(FORM_TEXT_INPUT_STYLE)
                {}
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Generate AI Tips"
            }
        }
    }
}

/// The raw values from the AI tips form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TipsForm {
    pub monthly_income: String,
    pub monthly_expenses: String,
    pub savings_goal: String,
    pub current_savings: String,
    pub debt_amount: String,
    pub age: String,
    pub financial_goals: String,
    pub risk_tolerance: String,
    pub tip_type: String,
    pub context: String,
}

impl From<TipsForm> for TipsRequestInput {
    fn from(form: TipsForm) -> Self {
        let text = |value: String| Some(Value::String(value));

        Self {
            profile: Some(ProfileInput {
                monthly_income: text(form.monthly_income),
                monthly_expenses: text(form.monthly_expenses),
                savings_goal: text(form.savings_goal),
                current_savings: text(form.current_savings),
                debt_amount: text(form.debt_amount),
                age: text(form.age),
                financial_goals: text(form.financial_goals),
                spending_categories: None,
                risk_tolerance: Some(form.risk_tolerance),
            }),
            tip_type: Some(form.tip_type),
            context: Some(form.context),
        }
    }
}

/// Generate tips from the submitted form and render them as an HTML fragment.
///
/// Failures are rendered as an error alert.
pub async fn post_ai_tips_form(
    State(state): State<AiTipsState>,
    Form(form): Form<TipsForm>,
) -> Response {
    match request_tips(&state.ai_service, form.into()).await {
        Ok(tips) => tips_view(&tips).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn priority_style(priority: &str) -> &'static str {
    match priority.to_lowercase().as_str() {
        "high" => "bg-red-100 text-red-800",
        "medium" => "bg-yellow-100 text-yellow-800",
        "low" => "bg-green-100 text-green-800",
        _ => "bg-gray-100 text-gray-800",
    }
}

fn tips_view(tips: &TipsResponse) -> Markup {
    html! {
        div id="tips" class="space-y-6 text-gray-900 dark:text-white"
        {
            div class="flex items-center justify-between"
            {
                h2 class="text-lg font-semibold" { "Your Personalized Financial Tips" }

                span
                    id="priority"
                    class={ "px-2 py-1 rounded text-sm font-medium " (priority_style(&tips.priority_level)) }
                {
                    (tips.priority_level) " Priority"
                }
            }

            p id="personalized-message" class="p-4 rounded-lg bg-purple-50 dark:bg-gray-800"
            {
                (tips.personalized_message)
            }

            div id="estimated-impact" class="p-4 rounded-lg bg-green-50 dark:bg-gray-800"
            {
                h3 class="font-semibold" { "Expected Impact" }
                p { (tips.estimated_impact) }
            }

            div
            {
                h3 class="font-semibold mb-2" { "Financial Tips" }

                ol id="tip-list" class="list-decimal list-inside space-y-2"
                {
                    @for tip in &tips.tips {
                        li { (tip) }
                    }
                }
            }

            @if !tips.action_items.is_empty() {
                div
                {
                    h3 class="font-semibold mb-2" { "Action Items" }

                    ul id="action-items" class="list-disc list-inside space-y-2"
                    {
                        @for item in &tips.action_items {
                            li { (item) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod ai_tips_page_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use scraper::{Html, Selector};

    use crate::{
        ai_tips::{
            AiServiceClient, AiTipsState, DEFAULT_AI_SERVICE_TIMEOUT, RiskTolerance, TipType,
            TipsRequest, TipsRequestInput,
            client::test_service::{failing_service, healthy_service, serve},
        },
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{TipsForm, get_ai_tips_page, post_ai_tips_form};

    async fn get_test_server(ai_service: Router) -> TestServer {
        let base_url = serve(ai_service).await;
        let state = AiTipsState {
            ai_service: AiServiceClient::new(&base_url, DEFAULT_AI_SERVICE_TIMEOUT).unwrap(),
        };

        let app = Router::new()
            .route(endpoints::AI_TIPS_VIEW, post(post_ai_tips_form))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn page_renders_profile_form() {
        let response = get_ai_tips_page().await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::AI_TIPS_VIEW, "hx-post");
        assert_form_input(&form, "monthly_income", "number");
        assert_form_input(&form, "monthly_expenses", "number");
        assert_form_submit_button(&form);

        let options = form
            .select(&Selector::parse("select[name=tip_type] option").unwrap())
            .map(|option| option.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(
            options,
            [
                "General Advice",
                "Budgeting",
                "Saving Money",
                "Investment",
                "Debt Management",
                "Emergency Fund"
            ]
        );

        let selected_risk = form
            .select(&Selector::parse("select[name=risk_tolerance] option[selected]").unwrap())
            .next()
            .expect("want a selected risk tolerance");
        assert_eq!(selected_risk.value().attr("value"), Some("medium"));
    }

    #[tokio::test]
    async fn form_renders_tips() {
        let server = get_test_server(healthy_service()).await;

        let response = server
            .post(endpoints::AI_TIPS_VIEW)
            .form(&[
                ("monthly_income", "50000"),
                ("monthly_expenses", "30000"),
                ("savings_goal", ""),
                ("age", ""),
                ("tip_type", "budgeting"),
                ("risk_tolerance", "low"),
                ("context", ""),
            ])
            .await;

        response.assert_status_ok();
        let fragment = Html::parse_fragment(&response.text());
        let tips = fragment
            .select(&Selector::parse("#tip-list li").unwrap())
            .count();
        assert_eq!(tips, 3);

        let message = fragment
            .select(&Selector::parse("#personalized-message").unwrap())
            .next()
            .expect("want a personalised message")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), "tip type: budgeting");

        let priority = fragment
            .select(&Selector::parse("#priority").unwrap())
            .next()
            .expect("want a priority badge");
        assert!(
            priority
                .value()
                .attr("class")
                .is_some_and(|class| class.contains("bg-red-100"))
        );
    }

    #[tokio::test]
    async fn form_without_expenses_renders_alert() {
        let server = get_test_server(healthy_service()).await;

        let response = server
            .post(endpoints::AI_TIPS_VIEW)
            .form(&[("monthly_income", "50000"), ("monthly_expenses", "")])
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let fragment = Html::parse_fragment(&response.text());
        assert_eq!(
            fragment
                .select(&Selector::parse("[role=alert]").unwrap())
                .count(),
            1
        );
    }

    #[test]
    fn blank_form_fields_become_defaults() {
        let form = TipsForm {
            monthly_income: "50000".to_owned(),
            monthly_expenses: "30000".to_owned(),
            ..Default::default()
        };

        let request = TipsRequest::try_from(TipsRequestInput::from(form)).unwrap();

        assert_eq!(request.tip_type, TipType::General);
        assert_eq!(request.profile.risk_tolerance, RiskTolerance::Medium);
        assert_eq!(request.profile.age, 25);
        assert!(request.profile.financial_goals.is_empty());
        assert_eq!(request.context, None);
    }

    #[tokio::test]
    async fn upstream_failure_renders_alert() {
        let server = get_test_server(failing_service()).await;

        let response = server
            .post(endpoints::AI_TIPS_VIEW)
            .form(&[("monthly_income", "50000"), ("monthly_expenses", "30000")])
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let fragment = Html::parse_fragment(&response.text());
        let alert = fragment
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("want an error alert");
        assert!(alert.text().collect::<String>().contains("Failed to generate AI tips"));
    }
}
