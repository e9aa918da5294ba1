use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses the ISO-8601 date shapes models produce for resume dates.
///
/// Accepted: `YYYY-MM-DD`, RFC 3339 date-times, naive `YYYY-MM-DDTHH:MM:SS[.f]`,
/// and `YYYY-MM` (first of the month). Anything else is `None`; callers must
/// fail rather than pick a default.
pub fn parse_date_like(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Some(date);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_date_like("2021-03-15"), Some(ymd(2021, 3, 15)));
        assert_eq!(parse_date_like("  2021-03-15 "), Some(ymd(2021, 3, 15)));
    }

    #[test]
    fn test_parse_datetime_forms() {
        assert_eq!(
            parse_date_like("2021-03-15T10:30:00Z"),
            Some(ymd(2021, 3, 15))
        );
        assert_eq!(
            parse_date_like("2021-03-15T10:30:00.000+02:00"),
            Some(ymd(2021, 3, 15))
        );
        assert_eq!(
            parse_date_like("2021-03-15T10:30:00"),
            Some(ymd(2021, 3, 15))
        );
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_date_like("2019-07"), Some(ymd(2019, 7, 1)));
    }

    #[test]
    fn test_rejects_non_dates() {
        assert_eq!(parse_date_like(""), None);
        assert_eq!(parse_date_like("Present"), None);
        assert_eq!(parse_date_like("2021-13-01"), None);
        assert_eq!(parse_date_like("March 2021"), None);
        assert_eq!(parse_date_like("2021"), None);
    }
}
