//! Parsing of the raw date text stored with each transaction.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

const NAIVE_DATE_TIME_FORMATS: [&[BorrowedFormatItem]; 3] = [
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
];

/// Resolve `raw` to the calendar day it falls on in the timezone `offset`.
///
/// Accepts plain dates (`2024-03-01`), RFC 3339 timestamps
/// (`2024-03-01T10:30:00Z`) and naive date-times (`2024-03-01 10:30:00`).
/// Timestamps with an offset are shifted into `offset` before truncating to
/// a day; plain dates and naive date-times are taken as already local.
///
/// Returns `None` if `raw` is not in any of the accepted forms.
pub fn parse_transaction_date(raw: &str, offset: UtcOffset) -> Option<Date> {
    let raw = raw.trim();

    if let Ok(date) = Date::parse(raw, DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(date_time) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(date_time.to_offset(offset).date());
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
        .map(|date_time| date_time.date())
}

#[cfg(test)]
mod parse_transaction_date_tests {
    use time::{UtcOffset, macros::date};

    use super::parse_transaction_date;

    #[test]
    fn parses_plain_date() {
        assert_eq!(
            parse_transaction_date("2024-03-01", UtcOffset::UTC),
            Some(date!(2024 - 03 - 01))
        );
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        assert_eq!(
            parse_transaction_date("  2024-03-01\n", UtcOffset::UTC),
            Some(date!(2024 - 03 - 01))
        );
    }

    #[test]
    fn parses_rfc3339_timestamp() {
        assert_eq!(
            parse_transaction_date("2024-03-01T10:30:00Z", UtcOffset::UTC),
            Some(date!(2024 - 03 - 01))
        );
    }

    #[test]
    fn shifts_timestamp_into_local_day() {
        let auckland = UtcOffset::from_hms(13, 0, 0).unwrap();

        assert_eq!(
            parse_transaction_date("2024-03-01T20:00:00Z", auckland),
            Some(date!(2024 - 03 - 02))
        );
    }

    #[test]
    fn timestamp_with_own_offset_is_converted() {
        assert_eq!(
            parse_transaction_date("2024-03-02T05:00:00+13:00", UtcOffset::UTC),
            Some(date!(2024 - 03 - 01))
        );
    }

    #[test]
    fn parses_naive_date_time() {
        assert_eq!(
            parse_transaction_date("2023-12-31 23:59:59", UtcOffset::UTC),
            Some(date!(2023 - 12 - 31))
        );
        assert_eq!(
            parse_transaction_date("2023-12-31T23:59:59", UtcOffset::UTC),
            Some(date!(2023 - 12 - 31))
        );
    }

    #[test]
    fn rejects_garbage() {
        for raw in ["", "yesterday", "2024-13-01", "2024-02-30", "01/03/2024", "Mar 01"] {
            assert_eq!(
                parse_transaction_date(raw, UtcOffset::UTC),
                None,
                "want {raw:?} to be rejected"
            );
        }
    }
}
