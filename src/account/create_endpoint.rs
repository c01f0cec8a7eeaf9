//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, account::create_account, endpoints};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// The account name
    pub name: String,
}

/// A route handler for creating a new account, redirects to the new account's
/// chart page on success.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("Could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
    {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    let account = match create_account(&form.name, &connection) {
        Ok(account) => account,
        Err(error) => {
            tracing::debug!("Could not create account with {form:?}: {error}");
            return error.into_alert_response();
        }
    };

    tracing::info!("Created account {} ({})", account.name, account.id);

    (
        HxRedirect(endpoints::format_endpoint(
            endpoints::ACCOUNT_VIEW,
            account.id,
        )),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
