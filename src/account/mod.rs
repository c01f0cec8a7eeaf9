mod core;
mod create_endpoint;
mod page;
mod summary;

pub use core::{
    Account, AccountId, create_account, create_account_table, get_account, get_all_accounts,
};
pub use create_endpoint::create_account_endpoint;
pub use page::get_account_page;
pub use summary::get_account_summary;
