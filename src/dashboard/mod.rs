//! Dashboard module
//!
//! Provides an overview page charting income vs expenses across every account.

mod handlers;

pub use handlers::get_dashboard_page;
