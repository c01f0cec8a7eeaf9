//! The page for a single account: its income vs expense chart and a form for
//! recording transactions.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    Error,
    account::{Account, AccountId, get_account},
    chart::{ChartState, RangeQuery, chart_section, load_aggregation},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, link, loading_spinner, rupee_input_styles,
    },
    navigation::NavBar,
    timezone::local_now,
};

/// Renders the chart page for the account in the URL path.
pub async fn get_account_page(
    State(state): State<ChartState>,
    Path(account_id): Path<AccountId>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, Error> {
    let account = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_account(account_id, &connection)?
    };

    let aggregation = load_aggregation(Some(account.id), query.range_key()?, &state)?;
    let today = local_now(&state.local_timezone)?.date();

    let page_url = endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, account.id);
    let (chart, mut head_elements) = chart_section(&aggregation, &page_url);
    head_elements.push(rupee_input_styles());

    let nav_bar = NavBar::new(endpoints::ACCOUNT_VIEW).into_html();
    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full flex justify-between items-baseline mb-4"
            {
                h1 class="text-xl font-bold" { (account.name) }
                (link(endpoints::DASHBOARD_VIEW, "Back to dashboard"))
            }

            (chart)

            (transaction_form(&account, today))
        }
    };

    Ok(base(&account.name, &head_elements, &content).into_response())
}

fn transaction_form(account: &Account, max_date: Date) -> Markup {
    html! {
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-disabled-elt="#submit-button"
            class={ "mt-8 max-w-md " (FORM_CONTAINER_STYLE) }
        {
            h2 class="text-lg font-semibold" { "Add transaction" }

            input type="hidden" name="account_id" value=(account.id);

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }

                select name="type" id="type" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="EXPENSE" selected { "Expense" }
                    option value="INCOME" { "Income" }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    max=(max_date)
                    value=(max_date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Groceries"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" { (loading_spinner()) }
                "Add transaction"
            }
        }
    }
}

#[cfg(test)]
mod account_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::OffsetDateTime;

    use crate::{
        account::create_account,
        aggregation::TransactionType,
        chart::{ChartState, RangeQuery},
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
        transaction::{NewTransaction, create_transaction},
    };

    use super::get_account_page;

    fn get_test_state() -> ChartState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let account = create_account("Everyday", &conn).unwrap();
        let today = OffsetDateTime::now_utc().date();
        create_transaction(
            NewTransaction {
                account_id: account.id,
                amount: 100.0,
                kind: TransactionType::Income,
                date: today,
                description: String::new(),
            },
            today,
            &conn,
        )
        .unwrap();

        ChartState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn renders_chart_and_transaction_form() {
        let state = get_test_state();

        let response = get_account_page(
            State(state),
            Path(1),
            Query(RangeQuery {
                range: Some("7D".to_owned()),
            }),
        )
        .await
        .into_response();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let title = html
            .select(&Selector::parse("h1").unwrap())
            .next()
            .expect("want a heading");
        assert_eq!(title.text().collect::<String>(), "Everyday");
        assert_eq!(
            html.select(&Selector::parse("#income-expense-chart").unwrap())
                .count(),
            1
        );
        let current_range = html
            .select(&Selector::parse("#range-selector a[aria-current=page]").unwrap())
            .next()
            .expect("want the current range to be highlighted");
        assert_eq!(current_range.text().collect::<String>(), "7D");

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let state = get_test_state();

        let response = get_account_page(State(state), Path(42), Query(RangeQuery::default()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
