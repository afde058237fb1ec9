#[cfg(test)]
mod tests {
    use crate::models::time::{add_days, day_of_year, format_date, is_weekend, parse_date};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_dash_format() {
        assert_eq!(parse_date("2024-01-01"), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_parse_date_slash_format() {
        assert_eq!(parse_date("2024/03/15"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parse_date_trims_whitespace() {
        assert_eq!(parse_date("  2024-02-29 "), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("BAD"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2023-02-29"), None);
    }

    #[test]
    fn test_format_date_roundtrip() {
        let d = date(2024, 4, 10);
        assert_eq!(format_date(d), "2024-04-10");
        assert_eq!(parse_date(&format_date(d)), Some(d));
    }

    #[test]
    fn test_is_weekend() {
        // 2024-04-13 is a Saturday
        assert!(is_weekend(date(2024, 4, 13)));
        assert!(is_weekend(date(2024, 4, 14)));
        assert!(!is_weekend(date(2024, 4, 15)));
        assert!(!is_weekend(date(2024, 4, 12)));
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(date(2024, 1, 1)), 1);
        assert_eq!(day_of_year(date(2024, 12, 31)), 366);
        assert_eq!(day_of_year(date(2023, 12, 31)), 365);
    }

    #[test]
    fn test_add_days_crosses_month() {
        assert_eq!(add_days(date(2024, 1, 31), 1), date(2024, 2, 1));
        assert_eq!(add_days(date(2024, 3, 1), -1), date(2024, 2, 29));
    }
}
