//! Request screening for attack patterns and automated clients.

mod attack;
mod bot;
mod middleware;

pub use middleware::{ShieldMode, shield_guard};
