//! Field normalization for scraped values.

use chrono::NaiveDate;

/// Date formats seen on storefront pages, tried in order.
const DATE_FORMATS: &[&str] = &["%Y年%m月%d日", "%Y/%m/%d", "%Y-%m-%d"];

/// Normalize a storefront release date to `YYYY-MM-DD`.
///
/// `2023年1月5日` becomes `2023-01-05`. Input that no known format accepts
/// only has its Japanese separators swapped for dashes.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    trimmed.replace(['年', '月'], "-").replace('日', "")
}

/// Year portion of a normalized date: its first four characters.
pub fn published_year(date: &str) -> String {
    date.chars().take(4).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_japanese_date() {
        assert_eq!(normalize_date("2023年01月01日"), "2023-01-01");
        assert_eq!(normalize_date("2023年1月5日"), "2023-01-05");
        assert_eq!(normalize_date("  2021年12月31日 "), "2021-12-31");
    }

    #[test]
    fn test_normalize_other_formats() {
        assert_eq!(normalize_date("2022/3/9"), "2022-03-09");
        assert_eq!(normalize_date("2022-03-09"), "2022-03-09");
    }

    #[test]
    fn test_normalize_date_fallback() {
        assert_eq!(normalize_date("2023年01月"), "2023-01-");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_published_year() {
        assert_eq!(published_year("2023-01-05"), "2023");
        assert_eq!(published_year("202"), "202");
        assert_eq!(published_year(""), "");
    }
}
