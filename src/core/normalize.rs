//! Cell cleanup: impression counts, day ranges, category paths and GA values.

use crate::utils::error::{DashError, Result};
use chrono::NaiveDate;

const IMPRESSIONS_SUFFIX: &str = " impressions";
const DAY_RANGE_SEPARATOR: &str = " - ";
const DAY_FORMAT: &str = "%a, %m/%d/%y";

/// `"1,234 impressions"` → `Some(1234)`; anything not purely digits → `None`.
pub fn parse_impressions(cell: &str) -> Option<i64> {
    let cleaned = cell.replace(IMPRESSIONS_SUFFIX, "").replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

pub fn impressions_or_zero(cell: &str) -> i64 {
    parse_impressions(cell).unwrap_or_else(|| {
        tracing::debug!("Non-numeric impressions cell '{}', using 0", cell);
        0
    })
}

/// Last segment of a `|`-delimited category path.
pub fn category_name(cell: &str) -> String {
    cell.rsplit('|').next().unwrap_or(cell).trim().to_string()
}

pub fn extract_category_names<S: AsRef<str>>(cells: &[S]) -> Vec<String> {
    cells.iter().map(|c| category_name(c.as_ref())).collect()
}

/// First day of a `"Mon, 01/02/23 - Sun, 01/08/23"` range.
pub fn start_date(days: &str) -> Result<NaiveDate> {
    let first = days
        .split(DAY_RANGE_SEPARATOR)
        .next()
        .unwrap_or(days)
        .trim();

    NaiveDate::parse_from_str(first, DAY_FORMAT).map_err(|e| {
        DashError::processing(format!("cannot read a start date from '{}': {}", days, e))
    })
}

/// GA `date` dimension values come back as `YYYYMMDD`.
pub fn parse_report_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|e| DashError::processing(format!("invalid report date '{}': {}", value, e)))
}

pub fn parse_metric(value: &str) -> Result<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(DashError::processing(format!(
            "invalid metric value '{}'",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_impressions_strips_suffix_and_separators() {
        assert_eq!(parse_impressions("1,234 impressions"), Some(1234));
        assert_eq!(parse_impressions("12,345,678 impressions"), Some(12_345_678));
        assert_eq!(parse_impressions("42"), Some(42));
    }

    #[test]
    fn test_parse_impressions_rejects_text() {
        assert_eq!(parse_impressions("N/A"), None);
        assert_eq!(parse_impressions("-"), None);
        assert_eq!(parse_impressions(""), None);
        assert_eq!(parse_impressions("1.5 impressions"), None);
    }

    #[test]
    fn test_non_numeric_impressions_fall_back_to_zero() {
        assert_eq!(impressions_or_zero("< 100 impressions"), 0);
        assert_eq!(impressions_or_zero("--"), 0);
        assert_eq!(impressions_or_zero("7,001 impressions"), 7001);
    }

    #[test]
    fn test_category_name_takes_last_segment() {
        assert_eq!(category_name("Demo | 18-24"), "18-24");
        assert_eq!(category_name("Interest | Sports | Football "), "Football");
        assert_eq!(category_name(" Everyone "), "Everyone");
    }

    #[test]
    fn test_extract_category_names() {
        let cells = vec!["Demo | 18-24", "Demo | 25-34"];
        assert_eq!(extract_category_names(&cells), vec!["18-24", "25-34"]);
    }

    #[test]
    fn test_start_date_from_day_range() {
        assert_eq!(
            start_date("Mon, 01/02/23 - Sun, 01/08/23").unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
        );
        assert_eq!(
            start_date("Tue, 02/14/23").unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 14).unwrap()
        );
    }

    #[test]
    fn test_start_date_rejects_garbage() {
        assert!(start_date("last week").is_err());
    }

    #[test]
    fn test_parse_report_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_report_date("20240309").unwrap(), expected);
        assert_eq!(parse_report_date("2024-03-09").unwrap(), expected);
        assert!(parse_report_date("03/09/2024").is_err());
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric("17").unwrap(), 17);
        assert_eq!(parse_metric("17.0").unwrap(), 17);
        assert!(parse_metric("17.5").is_err());
        assert!(parse_metric("many").is_err());
    }
}
