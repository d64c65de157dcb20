//! 대만 법정 공휴일 (증시 휴장일).
//!
//! 양력 고정 공휴일은 규칙으로 계산하고, 음력 공휴일과 보충/조정 휴일,
//! 결제 전용일은 연도별 표로 관리합니다. 표에 없는 연도는 고정 공휴일만
//! 적용되며, 태풍 휴장처럼 미리 알 수 없는 날짜는 사용자 지정 휴장일
//! 목록으로 보완합니다.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// 양력 고정 공휴일 (월, 일, 주말 대체 여부).
///
/// 대체 규칙: 토요일이면 직전 금요일, 일요일이면 다음 월요일.
const FIXED_HOLIDAYS: &[(u32, u32, bool)] = &[
    (1, 1, true),   // 中華民國開國紀念日
    (2, 28, true),  // 和平紀念日
    (4, 4, false),  // 兒童節
    (5, 1, false),  // 勞動節
    (10, 10, true), // 國慶日
];

/// 연도별 평일 휴장일 (연, 월, 일).
///
/// 양력 고정 규칙으로 나오지 않는 휴장일을 실제 날짜로 기록합니다.
/// 춘절(除夕, 初一~初三, 주말분 보충 휴일), 춘절 직전 결제 전용일
/// (매매 없음), 조정 휴일(調整放假), 兒童節/清明節 겹침에 따른 이동,
/// 端午節/中秋節의 대체 휴일이 포함됩니다.
const ANNUAL_CLOSURES: &[(i32, u32, u32)] = &[
    // ── 2019 ──────────────────────────────────────
    (2019, 1, 31), // 결제 전용
    (2019, 2, 1),  // 결제 전용
    (2019, 2, 4),  // 除夕
    (2019, 2, 5),  // 春節
    (2019, 2, 6),
    (2019, 2, 7),
    (2019, 2, 8), // 調整放假
    (2019, 3, 1), // 調整放假
    (2019, 4, 5), // 清明節
    (2019, 6, 7), // 端午節
    (2019, 9, 13), // 中秋節
    (2019, 10, 11), // 調整放假
    // ── 2020 ──────────────────────────────────────
    (2020, 1, 21),
    (2020, 1, 22),
    (2020, 1, 23),
    (2020, 1, 24),
    (2020, 1, 27),
    (2020, 1, 28),
    (2020, 1, 29),
    (2020, 4, 2), // 兒童節 (4/4 토요일, 清明節과 겹침)
    (2020, 4, 3), // 清明節 대체
    (2020, 6, 25),
    (2020, 6, 26),
    (2020, 10, 1),
    (2020, 10, 2),
    // ── 2021 ──────────────────────────────────────
    (2021, 2, 8),
    (2021, 2, 9),
    (2021, 2, 10),
    (2021, 2, 11),
    (2021, 2, 12),
    (2021, 2, 15),
    (2021, 2, 16),
    (2021, 4, 2),
    (2021, 4, 5),
    (2021, 6, 14),
    (2021, 9, 20),
    (2021, 9, 21),
    // ── 2022 ──────────────────────────────────────
    (2022, 1, 27),
    (2022, 1, 28),
    (2022, 1, 31),
    (2022, 2, 1),
    (2022, 2, 2),
    (2022, 2, 3),
    (2022, 2, 4),
    (2022, 4, 5),
    (2022, 6, 3),
    (2022, 9, 9),
    // ── 2023 ──────────────────────────────────────
    (2023, 1, 18),
    (2023, 1, 19),
    (2023, 1, 20),
    (2023, 1, 23),
    (2023, 1, 24),
    (2023, 1, 25), // 除夕(토) 보충
    (2023, 1, 26), // 初一(일) 보충
    (2023, 1, 27),
    (2023, 2, 27),
    (2023, 4, 3),
    (2023, 4, 5),
    (2023, 6, 22),
    (2023, 6, 23),
    (2023, 9, 29),
    (2023, 10, 9),
    // ── 2024 ──────────────────────────────────────
    (2024, 2, 6),
    (2024, 2, 7),
    (2024, 2, 8),
    (2024, 2, 9),
    (2024, 2, 12),
    (2024, 2, 13), // 初一(토) 보충
    (2024, 2, 14), // 初二(일) 보충
    (2024, 4, 5),  // 兒童節/清明節 겹침
    (2024, 6, 10),
    (2024, 9, 17),
    // ── 2025 ──────────────────────────────────────
    (2025, 1, 23),
    (2025, 1, 24),
    (2025, 1, 27),
    (2025, 1, 28),
    (2025, 1, 29),
    (2025, 1, 30),
    (2025, 1, 31),
    (2025, 4, 3), // 兒童節/清明節 겹침
    (2025, 5, 30), // 端午節 (5/31 토요일)
    (2025, 9, 29), // 教師節 (9/28 일요일)
    (2025, 10, 6),
    (2025, 10, 24), // 臺灣光復節 (10/25 토요일)
    (2025, 12, 25), // 行憲紀念日
    // ── 2026 ──────────────────────────────────────
    (2026, 2, 12),
    (2026, 2, 13),
    (2026, 2, 16),
    (2026, 2, 17),
    (2026, 2, 18),
    (2026, 2, 19),
    (2026, 2, 20), // 小年夜(일) 보충
    (2026, 4, 3),  // 兒童節 (4/4 토요일)
    (2026, 4, 6),  // 清明節 (4/5 일요일)
    (2026, 6, 19),
    (2026, 9, 25),
    (2026, 9, 28), // 教師節
    (2026, 10, 26), // 臺灣光復節 (10/25 일요일)
    (2026, 12, 25),
];

/// 연도별 휴장일 표가 포함하는 연도 범위.
pub const CLOSURE_TABLE_YEARS: std::ops::RangeInclusive<i32> = 2019..=2026;

/// 법정 공휴일(대체 휴일 포함)인지 확인합니다.
pub fn is_statutory_holiday(date: NaiveDate) -> bool {
    is_fixed_holiday(date) || is_annual_closure(date)
}

fn is_annual_closure(date: NaiveDate) -> bool {
    ANNUAL_CLOSURES.contains(&(date.year(), date.month(), date.day()))
}

fn is_fixed_holiday(date: NaiveDate) -> bool {
    FIXED_HOLIDAYS.iter().any(|&(month, day, observed)| {
        // 12월 31일 금요일은 다음 해 1월 1일(토)의 대체 휴일일 수 있음
        [date.year(), date.year() + 1].iter().any(|&year| {
            NaiveDate::from_ymd_opt(year, month, day)
                .map(|actual| {
                    let effective = if observed { observed_date(actual) } else { actual };
                    effective == date
                })
                .unwrap_or(false)
        })
    })
}

/// 주말에 걸린 공휴일의 대체 휴일.
fn observed_date(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_holidays() {
        assert!(is_statutory_holiday(ymd(2023, 10, 10)));
        assert!(is_statutory_holiday(ymd(2023, 2, 28)));
        assert!(is_statutory_holiday(ymd(2023, 5, 1)));
        assert!(!is_statutory_holiday(ymd(2023, 6, 1)));
    }

    #[test]
    fn test_observed_fixed_holidays() {
        // 2022-01-01 토요일 → 2021-12-31 금요일
        assert!(is_statutory_holiday(ymd(2021, 12, 31)));
        // 2021-02-28 일요일 → 2021-03-01 월요일
        assert!(is_statutory_holiday(ymd(2021, 3, 1)));
        // 2020-10-10 토요일 → 2020-10-09 금요일
        assert!(is_statutory_holiday(ymd(2020, 10, 9)));
        // 2021-10-10 일요일 → 2021-10-11 월요일
        assert!(is_statutory_holiday(ymd(2021, 10, 11)));
        // 노동절은 대체하지 않음
        assert!(!is_statutory_holiday(ymd(2022, 5, 2)));
    }

    #[test]
    fn test_lunar_holidays() {
        assert!(is_statutory_holiday(ymd(2023, 1, 23)));
        assert!(is_statutory_holiday(ymd(2023, 6, 22)));
        assert!(is_statutory_holiday(ymd(2024, 9, 17)));
        assert!(!is_statutory_holiday(ymd(2023, 6, 21)));
        assert!(!is_statutory_holiday(ymd(2023, 6, 26)));
    }

    #[test]
    fn test_weekend_lunar_holidays_are_made_up() {
        // 2023 除夕(1/21 토), 初一(1/22 일) → 1/25, 1/26
        assert!(is_statutory_holiday(ymd(2023, 1, 25)));
        assert!(is_statutory_holiday(ymd(2023, 1, 26)));
        // 2024 初一(2/10 토), 初二(2/11 일) → 2/13, 2/14
        assert!(is_statutory_holiday(ymd(2024, 2, 13)));
        assert!(is_statutory_holiday(ymd(2024, 2, 14)));
        // 兒童節/清明節 겹침
        assert!(is_statutory_holiday(ymd(2024, 4, 5)));
        assert!(is_statutory_holiday(ymd(2025, 4, 3)));
        // 조정 휴일과 결제 전용일
        assert!(is_statutory_holiday(ymd(2023, 6, 23)));
        assert!(is_statutory_holiday(ymd(2023, 1, 18)));
        // 춘절 전 마지막 매매일
        assert!(!is_statutory_holiday(ymd(2023, 1, 17)));
        assert!(!is_statutory_holiday(ymd(2024, 2, 15)));
    }

    #[test]
    fn test_closure_table_lists_weekdays_only() {
        for &(year, month, day) in ANNUAL_CLOSURES {
            let date = ymd(year, month, day);
            assert!(CLOSURE_TABLE_YEARS.contains(&year), "{}", date);
            assert!(
                !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
                "weekend in closure table: {}",
                date
            );
        }
    }

    #[test]
    fn test_closure_table_years_cover_lunar_new_year() {
        for year in CLOSURE_TABLE_YEARS {
            let count = ANNUAL_CLOSURES
                .iter()
                .filter(|&&(y, m, _)| y == year && m <= 2)
                .count();
            assert!(count >= 5, "year {}: {}", year, count);
        }
    }
}
