//! Date-range presets for the transaction charts.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use crate::Error;

/// A preset that determines how far back the charts look.
///
/// Query strings and JSON use the short keys, e.g. `?range=3M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateRangeKey {
    /// The last 7 days.
    SevenDays,
    /// The last 30 days.
    OneMonth,
    /// The last 90 days.
    ThreeMonths,
    /// The last 180 days.
    SixMonths,
    /// Every transaction, no lower bound.
    All,
}

impl DateRangeKey {
    /// Every preset, ordered from the narrowest window to the widest.
    pub const ALL_KEYS: [DateRangeKey; 5] = [
        DateRangeKey::SevenDays,
        DateRangeKey::OneMonth,
        DateRangeKey::ThreeMonths,
        DateRangeKey::SixMonths,
        DateRangeKey::All,
    ];

    /// The key used in URLs and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SevenDays => "7D",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::All => "ALL",
        }
    }

    /// The human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::SevenDays => "Last 7 Days",
            Self::OneMonth => "Last Month",
            Self::ThreeMonths => "Last 3 Months",
            Self::SixMonths => "Last 6 Months",
            Self::All => "All Time",
        }
    }

    /// How many days before today the window starts, `None` for an unbounded window.
    pub fn lookback_days(self) -> Option<i64> {
        match self {
            Self::SevenDays => Some(7),
            Self::OneMonth => Some(30),
            Self::ThreeMonths => Some(90),
            Self::SixMonths => Some(180),
            Self::All => None,
        }
    }

    /// The window of calendar days covered by this preset as seen from `now`.
    ///
    /// Both ends are inclusive: the lower bound is the start of the day
    /// `lookback_days` before `now`, the upper bound is the end of `now`'s day.
    pub fn window(self, now: OffsetDateTime) -> DateWindow {
        let end = now.date();
        let start = self
            .lookback_days()
            .map(|days| end.checked_sub(Duration::days(days)).unwrap_or(Date::MIN));

        DateWindow { start, end }
    }
}

impl Default for DateRangeKey {
    fn default() -> Self {
        Self::OneMonth
    }
}

impl FromStr for DateRangeKey {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "7D" => Ok(Self::SevenDays),
            "1M" => Ok(Self::OneMonth),
            "3M" => Ok(Self::ThreeMonths),
            "6M" => Ok(Self::SixMonths),
            "ALL" => Ok(Self::All),
            other => Err(Error::InvalidRangeKey(other.to_owned())),
        }
    }
}

impl TryFrom<String> for DateRangeKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateRangeKey> for String {
    fn from(key: DateRangeKey) -> Self {
        key.as_str().to_owned()
    }
}

impl Display for DateRangeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// The first day in the window, `None` if the window has no lower bound.
    pub start: Option<Date>,
    /// The last day in the window.
    pub end: Date,
}

impl DateWindow {
    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: Date) -> bool {
        date <= self.end && self.start.is_none_or(|start| start <= date)
    }
}
