//! JSON summary of an account's daily income and expenses.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::{
    Error,
    account::{AccountId, get_account},
    aggregation::{Aggregation, DailyBucket, DateRangeKey, Rejection, Totals},
    chart::{ChartState, RangeQuery, load_aggregation},
};

#[derive(Debug, Serialize)]
struct WindowBody {
    start: Option<String>,
    end: String,
}

#[derive(Debug, Serialize)]
struct SummaryBody {
    range: DateRangeKey,
    label: &'static str,
    window: WindowBody,
    series: Vec<DailyBucket>,
    totals: Totals,
    rejected: Vec<Rejection>,
}

impl From<Aggregation> for SummaryBody {
    fn from(aggregation: Aggregation) -> Self {
        Self {
            range: aggregation.range,
            label: aggregation.range.label(),
            window: WindowBody {
                start: aggregation.window.start.map(|start| start.to_string()),
                end: aggregation.window.end.to_string(),
            },
            series: aggregation.series,
            totals: aggregation.totals,
            rejected: aggregation.rejected,
        }
    }
}

/// Returns the aggregated chart data for the account in the URL path as JSON.
pub async fn get_account_summary(
    State(state): State<ChartState>,
    Path(account_id): Path<AccountId>,
    Query(query): Query<RangeQuery>,
) -> Response {
    match build_summary(account_id, &query, &state) {
        Ok(body) => Json(body).into_response(),
        Err(error @ Error::InvalidRangeKey(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(Error::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Account not found" })),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not summarise account {account_id}: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

fn build_summary(
    account_id: AccountId,
    query: &RangeQuery,
    state: &ChartState,
) -> Result<SummaryBody, Error> {
    let range = query.range_key()?;

    {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_account(account_id, &connection)?;
    }

    load_aggregation(Some(account_id), range, state).map(SummaryBody::from)
}
