//! Timestamp helpers
//!
//! Every timestamp Cadence persists is UTC text in one fixed-width format, so
//! ordering rows by the text column is the same as ordering them in time.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Current UTC time in the persisted format
pub fn now() -> String {
    format(Utc::now())
}

/// Render an instant in the persisted format (`2024-01-31T09:15:02.000123Z`)
pub fn format(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Validate a calendar date (`YYYY-MM-DD`) as used for album release dates
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 1, 31, 9, 15, 2).unwrap();
        assert_eq!(format(whole), "2024-01-31T09:15:02.000000Z");
        assert_eq!(now().len(), format(whole).len());
    }

    #[test]
    fn text_order_matches_time_order() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 31, 9, 15, 2).unwrap();
        let later = earlier + chrono::Duration::microseconds(1);
        assert!(format(earlier) < format(later));
    }

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert!(parse_date("2023-11-05").is_some());
        assert!(parse_date("05/11/2023").is_none());
        assert!(parse_date("2023-02-30").is_none());
    }
}
