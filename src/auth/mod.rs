//! Single-user password authentication with encrypted cookies.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_api, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use redirect::normalize_redirect_url;
pub(crate) use token::Token;
pub use user::{UserID, create_user_table, get_user_by_id, set_user_password};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
