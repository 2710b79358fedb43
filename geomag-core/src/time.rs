//! Conversion of instants to decimal years
//!
//! The secular variation terms are expressed per year, so every query date is
//! reduced to a decimal year before the coefficients are extrapolated.

use crate::errors::InvalidQueryError;
use crate::FloatValue;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

fn start_of_year(year: i32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
}

/// Express `date` as a decimal year
///
/// The fraction is the time elapsed since the start of the calendar year
/// divided by the length of that year, so it honours leap years.
/// January 1st 00:00:00 UTC of year `Y` maps exactly onto `Y`.
///
/// Fails only for dates in the final year chrono can represent.
pub fn decimal_year(date: &DateTime<Utc>) -> Result<FloatValue, InvalidQueryError> {
    let out_of_range = || InvalidQueryError::Date(date.to_rfc3339());
    let year = date.year();
    // A leap second is reported as nanoseconds >= 1e9; fold it into the final second
    let date = date
        .with_nanosecond(date.nanosecond().min(999_999_999))
        .ok_or_else(out_of_range)?;

    let start = start_of_year(year).ok_or_else(out_of_range)?;
    let end = start_of_year(year + 1).ok_or_else(out_of_range)?;
    let elapsed = (date - start).num_nanoseconds().ok_or_else(out_of_range)?;
    let length = (end - start).num_nanoseconds().ok_or_else(out_of_range)?;

    Ok(year as FloatValue + elapsed as FloatValue / length as FloatValue)
}

/// Parse a measurement date
///
/// Accepts RFC 3339 timestamps (`2025-03-14T12:00:00Z`, `2025-03-14T12:00:00+02:00`),
/// naive timestamps which are taken as UTC (`2025-03-14T12:00:00`, `2025-03-14 12:00:00`)
/// and plain calendar dates, which are taken as midnight UTC (`2025-03-14`).
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, InvalidQueryError> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| InvalidQueryError::Date(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_start_of_year_is_exact() {
        for year in [1900, 2000, 2024, 2025, 2100] {
            assert_eq!(decimal_year(&utc(year, 1, 1, 0, 0, 0)).unwrap(), year as FloatValue);
        }
    }

    #[test]
    fn test_last_second_of_year() {
        for year in [2023, 2024, 2025] {
            let value = decimal_year(&utc(year, 12, 31, 23, 59, 59)).unwrap();
            let next = (year + 1) as FloatValue;
            assert!(value < next, "{value} should be < {next}");
            assert!(value > year as FloatValue + 0.999);
        }
    }

    #[test]
    fn test_leap_year_midpoint() {
        // 2024 is a leap year: July 2nd 00:00 is day 183 of 366 → exactly half way
        assert_eq!(decimal_year(&utc(2024, 7, 2, 0, 0, 0)).unwrap(), 2024.5);
        // 2025 has 365 days: midday on July 2nd is exactly half way
        assert_eq!(decimal_year(&utc(2025, 7, 2, 12, 0, 0)).unwrap(), 2025.5);
    }

    #[test]
    fn test_year_length_follows_calendar() {
        // Midnight on December 31st leaves exactly one day of the year
        let leap = decimal_year(&utc(2024, 12, 31, 0, 0, 0)).unwrap();
        assert_relative_eq!(leap, 2024.0 + 365.0 / 366.0, epsilon = 1e-12);
        let common = decimal_year(&utc(2025, 12, 31, 0, 0, 0)).unwrap();
        assert_relative_eq!(common, 2025.0 + 364.0 / 365.0, epsilon = 1e-12);
        let century = decimal_year(&utc(1900, 12, 31, 0, 0, 0)).unwrap();
        assert_relative_eq!(century, 1900.0 + 364.0 / 365.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sub_second_precision() {
        let date = utc(2025, 1, 1, 0, 0, 0) + chrono::Duration::milliseconds(500);
        let expected = 2025.0 + 0.5 / (365.0 * 86_400.0);
        assert_relative_eq!(decimal_year(&date).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = utc(2025, 3, 14, 0, 0, 0);
        assert_eq!(parse_date("2025-03-14").unwrap(), expected);
        assert_eq!(parse_date("2025-03-14T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_date("2025-03-14T02:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_date("2025-03-14T00:00:00").unwrap(), expected);
        assert_eq!(parse_date(" 2025-03-14 00:00:00 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(
            parse_date("14/03/2025"),
            Err(InvalidQueryError::Date("14/03/2025".to_string()))
        );
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("").is_err());
    }
}
