//! Defines the endpoint for recording a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    account::AccountId,
    aggregation::TransactionType,
    endpoints,
    timezone::local_now,
    transaction::{NewTransaction, create_transaction},
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The IANA timezone used to decide whether a date is in the future.
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The account to record the transaction against.
    pub account_id: AccountId,
    /// The value of the transaction in rupees.
    pub amount: f64,
    /// Either "INCOME" or "EXPENSE".
    #[serde(rename = "type")]
    pub kind: String,
    /// The date when the transaction ocurred.
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
}

/// A route handler for recording a transaction, redirects to the account's
/// chart page on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match local_now(&state.local_timezone) {
        Ok(now) => now.date(),
        Err(error) => return error.into_alert_response(),
    };

    let account_id = form.account_id;
    let transaction = NewTransaction {
        account_id,
        amount: form.amount,
        kind: TransactionType::from(form.kind),
        date: form.date,
        description: form.description,
    };

    let result = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| create_transaction(transaction, today, &connection));

    match result {
        Ok(id) => tracing::info!("Created transaction {id} for account {account_id}"),
        Err(error) => return error.into_alert_response(),
    }

    (
        HxRedirect(endpoints::format_endpoint(
            endpoints::ACCOUNT_VIEW,
            account_id,
        )),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        account::create_account,
        db::initialize,
        endpoints,
        test_utils::assert_hx_redirect,
        transaction::count_transactions,
    };

    use super::{CreateTransactionState, TransactionForm, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_account("Everyday", &conn).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn form(kind: &str, amount: f64) -> TransactionForm {
        TransactionForm {
            account_id: 1,
            amount,
            kind: kind.to_owned(),
            date: OffsetDateTime::now_utc().date(),
            description: "test transaction".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();

        let response =
            create_transaction_endpoint(State(state.clone()), Form(form("EXPENSE", 12.3))).await;

        assert_hx_redirect(
            &response,
            &endpoints::format_endpoint(endpoints::ACCOUNT_VIEW, 1),
        );
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(1, &connection), Ok(1));
    }

    #[tokio::test]
    async fn unknown_type_is_bad_request() {
        let state = get_test_state();

        let response =
            create_transaction_endpoint(State(state.clone()), Form(form("TRANSFER", 12.3))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(1, &connection), Ok(0));
    }

    #[tokio::test]
    async fn negative_amount_is_bad_request() {
        let state = get_test_state();

        let response =
            create_transaction_endpoint(State(state), Form(form("INCOME", -1.0))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn future_date_is_bad_request() {
        let state = get_test_state();
        let form = TransactionForm {
            date: OffsetDateTime::now_utc().date() + Duration::days(2),
            ..form("INCOME", 10.0)
        };

        let response = create_transaction_endpoint(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_account_is_bad_request() {
        let state = get_test_state();
        let form = TransactionForm {
            account_id: 99,
            ..form("INCOME", 10.0)
        };

        let response = create_transaction_endpoint(State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn form_decodes_type_field() {
        let form: TransactionForm = serde_html_form::from_str(
            "account_id=3&amount=250.5&type=INCOME&date=2025-01-31&description=Salary",
        )
        .unwrap();

        assert_eq!(form.account_id, 3);
        assert_eq!(form.amount, 250.5);
        assert_eq!(form.kind, "INCOME");
        assert_eq!(form.date, time::macros::date!(2025 - 01 - 31));
    }
}
