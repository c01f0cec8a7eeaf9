//! Transaction windowing and per-day aggregation for the income/expense charts.

mod daily;
mod parse;
mod range;

pub use daily::{
    Aggregation, DailyBucket, Rejection, Totals, Transaction, TransactionType, aggregate,
};
pub use range::DateRangeKey;
