//! Calendar-date parsing for claims fields.
//!
//! Only the calendar day matters downstream, so timestamp inputs are
//! truncated to their date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use ct_common::{Error, Result};

use super::columns::field;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a date or timestamp string to its calendar day.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive())
}

/// Required date column of `record`; an unparseable or blank value aborts
/// the load with [`Error::DataFormat`].
pub(crate) fn date_field(
    record: &StringRecord,
    idx: usize,
    name: &str,
    line: u64,
    input: &str,
) -> Result<NaiveDate> {
    let raw = field(record, idx);
    parse_date(raw).ok_or_else(|| Error::DataFormat {
        input: input.to_string(),
        line,
        field: name.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_date("2019-03-07"), Some(d(2019, 3, 7)));
        assert_eq!(parse_date(" 2019/03/07 "), Some(d(2019, 3, 7)));
    }

    #[test]
    fn truncates_timestamps_to_calendar_day() {
        assert_eq!(parse_date("2019-03-07 23:59:59"), Some(d(2019, 3, 7)));
        assert_eq!(parse_date("2019-03-07 08:00:00.250"), Some(d(2019, 3, 7)));
        assert_eq!(parse_date("2019-03-07T08:00:00"), Some(d(2019, 3, 7)));
        assert_eq!(parse_date("2019-03-07T08:00:00+00:00"), Some(d(2019, 3, 7)));
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2019-02-30"), None);
        assert_eq!(parse_date("07/03/2019"), None);
    }
}
