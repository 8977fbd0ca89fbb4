//! Input validators for dates and employee identifiers
//!
//! Pure functions, no I/O. Tool implementations run these before any
//! network call so malformed input never reaches the backend.

use chrono::{Duration, NaiveDate};

use crate::error::{RollcallError, RollcallResult};

/// Canonical date format accepted from the user and the model.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format required by the leave endpoint.
pub const LEAVE_WIRE_FORMAT: &str = "%d-%m-%Y";

/// How far in the future a leave query may start, in days.
pub const FUTURE_START_HORIZON_DAYS: i64 = 30;

/// True iff `s` is exactly `YYYY-MM-DD` and denotes a real calendar date.
///
/// Re-formatting the parsed date and comparing catches shapes chrono would
/// otherwise tolerate, like `2024-1-1`.
pub fn is_valid_date(s: &str) -> bool {
    match NaiveDate::parse_from_str(s, DATE_FORMAT) {
        Ok(date) => date.format(DATE_FORMAT).to_string() == s,
        Err(_) => false,
    }
}

/// True iff the trimmed identifier is at least 3 characters.
///
/// Does not check existence against any backend.
pub fn is_valid_employee_id(s: &str) -> bool {
    s.trim().chars().count() >= 3
}

/// Parse a date string under the canonical format.
pub fn parse_date(s: &str) -> RollcallResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| RollcallError::InvalidDate(s.to_string(), DATE_FORMAT.to_string()))
}

/// Reformat a date string from one textual format to another.
///
/// Fails loudly when `s` does not parse under `from_format`; the conversion
/// is lossless for valid inputs.
pub fn convert_date(s: &str, from_format: &str, to_format: &str) -> RollcallResult<String> {
    let date = NaiveDate::parse_from_str(s, from_format)
        .map_err(|_| RollcallError::InvalidDate(s.to_string(), from_format.to_string()))?;
    Ok(date.format(to_format).to_string())
}

/// True iff `start` is no more than [`FUTURE_START_HORIZON_DAYS`] after `today`.
pub fn within_future_horizon(start: NaiveDate, today: NaiveDate) -> bool {
    start <= today + Duration::days(FUTURE_START_HORIZON_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dates() {
        assert!(is_valid_date("2024-01-01"));
        assert!(is_valid_date("2024-12-31"));
        // 2024 is a leap year
        assert!(is_valid_date("2024-02-29"));
    }

    #[test]
    fn test_invalid_dates() {
        assert!(!is_valid_date("2024-02-30"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2024-13-01"));
        assert!(!is_valid_date("01-01-2024"));
        assert!(!is_valid_date("2024-1-1"));
        assert!(!is_valid_date("2024/01/01"));
        assert!(!is_valid_date(""));
        assert!(!is_valid_date("not a date"));
    }

    #[test]
    fn test_employee_id_length_rule() {
        assert!(is_valid_employee_id("ABC"));
        assert!(is_valid_employee_id("MMT6765"));
        assert!(is_valid_employee_id("  ABC  "));
        assert!(!is_valid_employee_id("AB"));
        assert!(!is_valid_employee_id("  AB  "));
        assert!(!is_valid_employee_id(""));
        assert!(!is_valid_employee_id("   "));
    }

    #[test]
    fn test_convert_date_to_wire_format() {
        let wire = convert_date("2024-01-31", DATE_FORMAT, LEAVE_WIRE_FORMAT).unwrap();
        assert_eq!(wire, "31-01-2024");
    }

    #[test]
    fn test_convert_date_round_trip() {
        let original = "2024-06-15";
        let wire = convert_date(original, DATE_FORMAT, LEAVE_WIRE_FORMAT).unwrap();
        let back = convert_date(&wire, LEAVE_WIRE_FORMAT, DATE_FORMAT).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_convert_date_rejects_malformed_input() {
        let err = convert_date("2024-02-30", DATE_FORMAT, LEAVE_WIRE_FORMAT).unwrap_err();
        assert!(err.to_string().contains("2024-02-30"));

        assert!(convert_date("garbage", DATE_FORMAT, LEAVE_WIRE_FORMAT).is_err());
    }

    #[test]
    fn test_future_horizon() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(within_future_horizon(today, today));
        assert!(within_future_horizon(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            today
        ));
        assert!(!within_future_horizon(
            NaiveDate::from_ymd_opt(2024, 7, 2).unwrap(),
            today
        ));
        // past dates are always inside the horizon
        assert!(within_future_horizon(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            today
        ));
    }
}
