//! Groups transactions into per-day income and expense buckets.
//!
//! [aggregate] is pure: the caller supplies the clock reading, nothing is
//! cached between calls, and the input slice is never modified.

use std::{collections::BTreeMap, fmt::Display};

use serde::{Serialize, Serializer};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::aggregation::{
    parse::parse_transaction_date,
    range::{DateRangeKey, DateWindow},
};

/// Whether money came in or went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
    /// A type string that is neither income nor expense, kept verbatim.
    Unknown(String),
}

impl TransactionType {
    /// The text stored in the database.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for TransactionType {
    fn from(raw: &str) -> Self {
        match raw {
            "INCOME" => Self::Income,
            "EXPENSE" => Self::Expense,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl From<String> for TransactionType {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slice of a stored transaction that the charts need.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The raw date text, see [parse_transaction_date] for the accepted forms.
    pub date: String,
    /// The magnitude of the transaction.
    pub amount: f64,
    /// Whether the amount counts as income or expense.
    pub kind: TransactionType,
}

/// Income and expense summed over a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBucket {
    /// The display label, e.g. "Mar 01".
    #[serde(rename = "date")]
    pub label: String,
    /// The calendar day the bucket covers.
    #[serde(serialize_with = "serialize_iso_date")]
    pub day: Date,
    /// Income received on `day`.
    pub income: f64,
    /// Expenses paid on `day`.
    pub expense: f64,
}

/// Income and expense summed over a whole series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Total income.
    pub income: f64,
    /// Total expenses.
    pub expense: f64,
}

impl Totals {
    /// Income minus expenses.
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

impl Serialize for Totals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Totals", 3)?;
        state.serialize_field("income", &self.income)?;
        state.serialize_field("expense", &self.expense)?;
        state.serialize_field("net", &self.net())?;
        state.end()
    }
}

/// Why a transaction was left out of the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RejectionReason {
    /// The date text could not be resolved to a calendar day.
    UnparsableDate(String),
    /// The type was neither income nor expense.
    UnknownType(String),
    /// The amount was negative, NaN or infinite.
    InvalidAmount(f64),
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnparsableDate(raw) => write!(f, "unparsable date {raw:?}"),
            Self::UnknownType(raw) => write!(f, "unknown transaction type {raw:?}"),
            Self::InvalidAmount(amount) => write!(f, "invalid amount {amount}"),
        }
    }
}

/// A transaction that was left out of the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    /// The position of the transaction in the input slice.
    pub index: usize,
    /// What was wrong with it.
    pub reason: RejectionReason,
}

/// The output of [aggregate].
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// The preset that was applied.
    pub range: DateRangeKey,
    /// The calendar days covered by `range`.
    pub window: DateWindow,
    /// One bucket per day with at least one transaction, oldest first.
    pub series: Vec<DailyBucket>,
    /// The sums over `series`.
    pub totals: Totals,
    /// Transactions that could not be aggregated.
    pub rejected: Vec<Rejection>,
}

impl Aggregation {
    /// Whether there is nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct DaySums {
    income: f64,
    expense: f64,
}

/// Bucket `transactions` by calendar day for the window `range` ending on `now`.
///
/// Dates are interpreted in `now`'s offset. Transactions outside the window
/// are skipped. Transactions with an unparsable date, an unknown type or an
/// invalid amount are skipped and reported in [Aggregation::rejected],
/// checked in that order.
///
/// The series is ordered by calendar day and the totals are summed from the
/// series, so the totals always match the buckets.
pub fn aggregate(
    transactions: &[Transaction],
    range: DateRangeKey,
    now: OffsetDateTime,
) -> Aggregation {
    let window = range.window(now);
    let offset = now.offset();

    let mut days: BTreeMap<Date, DaySums> = BTreeMap::new();
    let mut rejected = Vec::new();

    for (index, transaction) in transactions.iter().enumerate() {
        let day = match parse_transaction_date(&transaction.date, offset) {
            Some(day) => day,
            None => {
                rejected.push(Rejection {
                    index,
                    reason: RejectionReason::UnparsableDate(transaction.date.clone()),
                });
                continue;
            }
        };

        let is_income = match &transaction.kind {
            TransactionType::Income => true,
            TransactionType::Expense => false,
            TransactionType::Unknown(raw) => {
                rejected.push(Rejection {
                    index,
                    reason: RejectionReason::UnknownType(raw.clone()),
                });
                continue;
            }
        };

        if !transaction.amount.is_finite() || transaction.amount < 0.0 {
            rejected.push(Rejection {
                index,
                reason: RejectionReason::InvalidAmount(transaction.amount),
            });
            continue;
        }

        if !window.contains(day) {
            continue;
        }

        let sums = days.entry(day).or_default();
        if is_income {
            sums.income += transaction.amount;
        } else {
            sums.expense += transaction.amount;
        }
    }

    let spans_multiple_years = match (days.first_key_value(), days.last_key_value()) {
        (Some((first, _)), Some((last, _))) => first.year() != last.year(),
        _ => false,
    };

    let series: Vec<DailyBucket> = days
        .into_iter()
        .map(|(day, sums)| DailyBucket {
            label: format_day_label(day, spans_multiple_years),
            day,
            income: sums.income,
            expense: sums.expense,
        })
        .collect();

    let totals = series.iter().fold(Totals::default(), |totals, bucket| Totals {
        income: totals.income + bucket.income,
        expense: totals.expense + bucket.expense,
    });

    Aggregation {
        range,
        window,
        series,
        totals,
        rejected,
    }
}

const DAY_LABEL_FORMAT: &[BorrowedFormatItem] = format_description!("[month repr:short] [day]");
const DAY_LABEL_WITH_YEAR_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day] [year]");

/// Format `day` as e.g. "Mar 01", or "Mar 01 2024" when `with_year` is set.
pub fn format_day_label(day: Date, with_year: bool) -> String {
    let format = if with_year {
        DAY_LABEL_WITH_YEAR_FORMAT
    } else {
        DAY_LABEL_FORMAT
    };

    day.format(format).unwrap_or_else(|error| {
        tracing::error!("Could not format day label for {day}: {error}");
        day.to_string()
    })
}

fn serialize_iso_date<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(date)
}
