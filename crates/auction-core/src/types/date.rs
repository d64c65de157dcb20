//! 날짜 문자열 파싱.
//!
//! 명단 스프레드시트와 가격 테이블은 서로 다른 날짜 표기를 사용합니다
//! (`2023/06/01`, `2023-06-01`, `20230601`, `2023-06-01 00:00:00`).

use chrono::NaiveDate;

/// 허용하는 날짜 형식 (시간 부분은 잘라낸 뒤 적용).
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// 표준 날짜 형식 (`YYYY-MM-DD`).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// 날짜 문자열을 달력 날짜로 변환합니다.
///
/// 앞뒤 공백은 무시하고, 공백이나 `T` 뒤의 시간 부분은 버립니다.
/// 어떤 형식에도 맞지 않으면 `None`을 반환합니다.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let date_part = trimmed
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// 날짜를 `YYYY-MM-DD` 문자열로 변환합니다.
pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_supported_formats() {
        assert_eq!(parse_date("2023-06-01"), Some(ymd(2023, 6, 1)));
        assert_eq!(parse_date("2023/06/01"), Some(ymd(2023, 6, 1)));
        assert_eq!(parse_date("2023/6/1"), Some(ymd(2023, 6, 1)));
        assert_eq!(parse_date("20230601"), Some(ymd(2023, 6, 1)));
        assert_eq!(parse_date("  2023-06-01 09:00:00 "), Some(ymd(2023, 6, 1)));
        assert_eq!(parse_date("2023-06-01T00:00:00"), Some(ymd(2023, 6, 1)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("2023-13-01"), None);
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("無資料"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2023, 1, 9)), "2023-01-09");
    }
}
