//! Display formatting for dates stored as strings.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Formats `2025-09-15` as `15 Sep 2025`.
///
/// Empty input gives an empty string; input that is not a recognisable date is
/// returned unchanged.
pub fn format_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match parse_date(raw) {
        Some(date) => date.format("%-d %b %Y").to_string(),
        None => raw.to_string(),
    }
}

/// Day of the month, for the calendar badge on event cards.
pub fn day_of_month(raw: &str) -> Option<u32> {
    parse_date(raw).map(|date| date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_plain_dates() {
        assert_eq!(format_date("2025-09-15"), "15 Sep 2025");
        assert_eq!(format_date("2025-10-02"), "2 Oct 2025");
    }

    #[test]
    fn formats_timestamps() {
        assert_eq!(format_date("2025-10-20T10:30:00Z"), "20 Oct 2025");
        assert_eq!(format_date("2025-10-20T10:30"), "20 Oct 2025");
    }

    #[test]
    fn empty_and_garbage_inputs() {
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("next tuesday"), "next tuesday");
        assert_eq!(day_of_month("next tuesday"), None);
        assert_eq!(day_of_month("2025-10-20"), Some(20));
    }
}
