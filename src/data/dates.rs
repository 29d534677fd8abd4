//! Permissive `publish_time` parsing.
//!
//! Publication metadata mixes full timestamps, plain dates, `2020 Mar 15` style dates and bare
//! years. Partial values resolve to the start of their period. Anything unrecognised is `None`;
//! callers null the field and keep the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%Y %b %d",
    "%d %b %Y",
    "%b %d, %Y",
    "%b %d %Y",
];

/// Parse a raw publish time, returning `None` for empty or unrecognised input.
pub fn parse_publish_time(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_local());
    }

    if let Some(parsed) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(parsed);
    }

    parse_date(value).map(|date| date.and_time(NaiveTime::MIN))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    {
        return Some(date);
    }

    // Month precision: "2020-03", "2020 Mar"
    if let Some(date) = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{value} 01"), "%Y %b %d").ok())
    {
        return Some(date);
    }

    // Year precision
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        let year = value.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

/// Render a publish time so that [`parse_publish_time`] reads it back unchanged.
///
/// Fractional seconds are written only when present.
pub fn format_publish_time(time: &NaiveDateTime) -> String {
    if time.time() == NaiveTime::MIN {
        time.format("%Y-%m-%d").to_string()
    } else {
        time.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn year_of(raw: &str) -> Option<i32> {
        parse_publish_time(raw).map(|t| t.year())
    }

    #[test]
    fn parses_common_forms() {
        assert_eq!(year_of("2020-03-15"), Some(2020));
        assert_eq!(year_of("2020-03-15 10:30:00"), Some(2020));
        assert_eq!(year_of("2020-03-15T10:30:00.123"), Some(2020));
        assert_eq!(year_of("2019-12-31T23:30:00-05:00"), Some(2019));
        assert_eq!(year_of("2020/03/15"), Some(2020));
        assert_eq!(year_of("03/15/2020"), Some(2020));
        assert_eq!(year_of("2020 Mar 15"), Some(2020));
        assert_eq!(year_of("15 Mar 2020"), Some(2020));
        assert_eq!(year_of("Mar 15, 2020"), Some(2020));
    }

    #[test]
    fn partial_dates_resolve_to_period_start() {
        let month = parse_publish_time("2020-03").unwrap();
        assert_eq!((month.year(), month.month(), month.day()), (2020, 3, 1));

        let named_month = parse_publish_time("2021 Jul").unwrap();
        assert_eq!((named_month.year(), named_month.month()), (2021, 7));

        let year = parse_publish_time(" 2018 ").unwrap();
        assert_eq!((year.year(), year.month(), year.day()), (2018, 1, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_publish_time(""), None);
        assert_eq!(parse_publish_time("   "), None);
        assert_eq!(parse_publish_time("not a date"), None);
        assert_eq!(parse_publish_time("2020-13-45"), None);
        assert_eq!(parse_publish_time("20201"), None);
    }

    #[test]
    fn formatting_reads_back() {
        for raw in ["2020-03-15", "2020-03-15 10:30:00", "2020", "2020 Mar"] {
            let parsed = parse_publish_time(raw).unwrap();
            let formatted = format_publish_time(&parsed);
            assert_eq!(parse_publish_time(&formatted), Some(parsed), "{raw}");
        }
        let midnight = parse_publish_time("2020-03-15").unwrap();
        assert_eq!(format_publish_time(&midnight), "2020-03-15");
    }

    #[test]
    fn fractional_seconds_survive_formatting() {
        let parsed = parse_publish_time("2020-03-15T10:00:00.5Z").unwrap();
        let formatted = format_publish_time(&parsed);

        assert_eq!(formatted, "2020-03-15 10:00:00.500");
        assert_eq!(parse_publish_time(&formatted), Some(parsed));

        let whole = parse_publish_time("2020-03-15 10:30:00").unwrap();
        assert_eq!(format_publish_time(&whole), "2020-03-15 10:30:00");
    }
}
