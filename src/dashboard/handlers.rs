//! Dashboard HTTP handlers and view rendering.
//!
//! The dashboard charts income vs expenses across every account and lists the
//! accounts with a form for creating new ones.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    account::{Account, get_all_accounts},
    chart::{ChartState, RangeQuery, chart_section, load_aggregation},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
};

/// Display a page with an overview of the user's income and expenses.
pub async fn get_dashboard_page(
    State(state): State<ChartState>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, Error> {
    let range = query.range_key()?;

    let accounts = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_accounts(&connection)
            .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?
    };

    let aggregation = load_aggregation(None, range, &state)?;
    let (chart, head_elements) = chart_section(&aggregation, endpoints::DASHBOARD_VIEW);

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4 self-start" { "Dashboard" }

            (chart)

            div class="w-full grid grid-cols-1 lg:grid-cols-2 gap-8 mt-8"
            {
                (accounts_list(&accounts))
                (create_account_form())
            }
        }
    };

    Ok(base("Dashboard", &head_elements, &content).into_response())
}

fn accounts_list(accounts: &[Account]) -> Markup {
    html! {
        section id="accounts"
        {
            h2 class="text-lg font-semibold mb-2" { "Accounts" }

            @if accounts.is_empty() {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "No accounts yet. Create one to start recording transactions."
                }
            } @else {
                ul class="space-y-2"
                {
                    @for account in accounts {
                        li
                        {
                            a
                                href=(endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, account.id))
                                class=(LINK_STYLE)
                            {
                                (account.name)
                            }
                        }
                    }
                }
            }
        }
    }
}

fn create_account_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::ACCOUNTS_API)
            hx-disabled-elt="#create-account-button"
            class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-lg font-semibold" { "New account" }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="Everyday"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="create-account-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" { (loading_spinner()) }
                "Create account"
            }
        }
    }
}
