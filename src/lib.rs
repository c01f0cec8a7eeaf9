//! FinWise is a web app for tracking income and expenses across accounts.
//!
//! This library provides a REST API that directly serves HTML pages: per-day
//! income vs expense charts over a selectable date range, forms for recording
//! accounts and transactions, and personalised tips from an external AI
//! service.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod aggregation;
mod ai_tips;
mod alert;
mod app_state;
mod auth;
mod chart;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod error_page;
mod html;
mod logging;
mod navigation;
mod routing;
mod shield;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountId, create_account};
pub use aggregation::TransactionType;
pub use ai_tips::{AiServiceClient, DEFAULT_AI_SERVICE_TIMEOUT};
pub use app_state::AppState;
pub use auth::{PasswordHash, UserID, ValidatedPassword, set_user_password};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use shield::ShieldMode;
pub use timezone::get_local_offset;
pub use transaction::{NewTransaction, create_transaction};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
