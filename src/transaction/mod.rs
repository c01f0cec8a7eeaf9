//! Recording income and expenses against accounts.
//!
//! This module contains:
//! - The `NewTransaction` model and the database functions for storing transactions
//! - Reading transactions back in the shape the chart aggregation expects
//! - The endpoint for recording a transaction from a form

mod core;
mod create_endpoint;

pub use core::{
    NewTransaction, create_transaction, create_transaction_table, get_chart_transactions,
};
pub use create_endpoint::create_transaction_endpoint;

#[cfg(test)]
pub use core::count_transactions;
