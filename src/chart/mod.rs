//! The income vs expense chart shared by the dashboard and account pages.
//!
//! Transactions are read from the database, aggregated into daily buckets for
//! the requested date range and rendered as summary cards, a range selector
//! and an ECharts bar chart.

mod cards;
mod charts;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::AccountId,
    aggregation::{Aggregation, DateRangeKey, aggregate},
    html::HeadElement,
    timezone::local_now,
    transaction::get_chart_transactions,
};

use cards::{range_selector, totals_cards};
use charts::{PageChart, chart_view, charts_script, daily_income_expense_chart};

/// The state needed to build a chart of transactions.
#[derive(Debug, Clone)]
pub struct ChartState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The IANA timezone used to decide what "today" is.
    pub local_timezone: String,
}

impl FromRef<AppState> for ChartState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for pages that show a chart.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
}

impl RangeQuery {
    /// The requested date range.
    ///
    /// A missing `range` falls back to the default range.
    ///
    /// # Errors
    /// Returns [Error::InvalidRangeKey] if `range` is not a known key.
    pub fn range_key(&self) -> Result<DateRangeKey, Error> {
        match &self.range {
            Some(key) => key.parse(),
            None => Ok(DateRangeKey::default()),
        }
    }
}

/// Aggregate the transactions of `account`, or of every account if `None`,
/// over `range` ending today.
pub(crate) fn load_aggregation(
    account: Option<AccountId>,
    range: DateRangeKey,
    state: &ChartState,
) -> Result<Aggregation, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_chart_transactions(account, &connection)?
    };

    let now = local_now(&state.local_timezone)?;
    let aggregation = aggregate(&transactions, range, now);

    for rejection in &aggregation.rejected {
        tracing::warn!(
            "Skipped transaction {} while charting: {}",
            rejection.index,
            rejection.reason
        );
    }

    Ok(aggregation)
}

/// Render the range selector, totals and chart for `aggregation`.
///
/// Returns the markup and the head elements needed to draw the chart.
pub(crate) fn chart_section(aggregation: &Aggregation, page_url: &str) -> (Markup, Vec<HeadElement>) {
    let chart = PageChart {
        id: "income-expense-chart",
        options: daily_income_expense_chart(aggregation).to_string(),
    };

    let markup = html! {
        section class="w-full"
        {
            (range_selector(page_url, aggregation.range))
            (totals_cards(&aggregation.totals))

            @if !aggregation.rejected.is_empty() {
                p
                    id="rejected-notice"
                    role="status"
                    class="mb-4 text-sm text-yellow-700 dark:text-yellow-400"
                {
                    (aggregation.rejected.len())
                    @if aggregation.rejected.len() == 1 {
                        " transaction could not be charted"
                    } @else {
                        " transactions could not be charted"
                    }
                    " because of an invalid date, type or amount."
                }
            }

            @if aggregation.is_empty() {
                div
                    id="empty-chart"
                    class="w-full min-h-[200px] flex items-center justify-center
                        rounded-lg border border-dashed border-gray-300 dark:border-gray-600"
                {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "No transactions for " (aggregation.range.label().to_lowercase()) "."
                    }
                }
            } @else {
                (chart_view(&chart))
            }
        }
    };

    let head_elements = if aggregation.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(&[chart]),
        ]
    };

    (markup, head_elements)
}
