/// Utilities for report date inputs
use chrono::{Datelike, NaiveDate};

/// Format used by `<input type="date">` and the report API
pub const ISO_DATE: &str = "%Y-%m-%d";

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE).ok()
}

pub fn to_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// First day of `today`'s month through `today`
pub fn current_month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today.with_day(1).unwrap_or(today), today)
}

/// Format ISO date string to DD.MM.YYYY format
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15.03.2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    match parse_iso_date(date_part) {
        Some(date) => date.format("%d.%m.%Y").to_string(),
        None => date_str.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_month_range() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (from, to) = current_month_range(today);
        assert_eq!(to_iso_date(from), "2024-03-01");
        assert_eq!(to, today);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15.03.2024");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "15.03.2024");
        assert_eq!(format_date("week 12"), "week 12");
    }

    #[test]
    fn test_parse_iso_date() {
        assert!(parse_iso_date(" 2024-02-29 ").is_some());
        assert!(parse_iso_date("2023-02-29").is_none());
        assert!(parse_iso_date("").is_none());
    }
}
