//! 대만 증시 거래일 캘린더.
//!
//! 거래일 = 주말이 아니고, 법정 공휴일이 아니며, 사용자 지정 휴장일도 아닌 날.
//! 캘린더는 배치 시작 시 한 번 생성하여 참조로 전달합니다.

mod overrides;
mod statutory;

pub use overrides::HolidayOverrides;
pub use statutory::{is_statutory_holiday, CLOSURE_TABLE_YEARS};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// 거래일이 아닌 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReason {
    /// 토요일/일요일
    Weekend,
    /// 법정 공휴일
    StatutoryHoliday,
    /// 사용자 지정 휴장일
    OverrideHoliday,
}

/// 거래일 판정기.
#[derive(Debug, Clone, Default)]
pub struct TradingCalendar {
    overrides: HolidayOverrides,
}

impl TradingCalendar {
    /// 사용자 지정 휴장일과 함께 캘린더를 생성합니다.
    pub fn new(overrides: HolidayOverrides) -> Self {
        Self { overrides }
    }

    /// 사용자 지정 휴장일 목록.
    pub fn overrides(&self) -> &HolidayOverrides {
        &self.overrides
    }

    /// 거래일인지 확인합니다.
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        self.closure(date).is_none()
    }

    /// 휴장 사유를 반환합니다 (거래일이면 `None`).
    ///
    /// 여러 사유가 겹치면 주말 → 법정 공휴일 → 사용자 지정 순으로 우선합니다.
    pub fn closure(&self, date: NaiveDate) -> Option<ClosureReason> {
        if is_weekend(date) {
            Some(ClosureReason::Weekend)
        } else if is_statutory_holiday(date) {
            Some(ClosureReason::StatutoryHoliday)
        } else if self.overrides.contains(date) {
            Some(ClosureReason::OverrideHoliday)
        } else {
            None
        }
    }

    /// `[start, end]` 구간의 거래일 목록 (양 끝 포함).
    pub fn trading_days_in(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        if start > end {
            return Vec::new();
        }
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_trading_day(*d))
            .collect()
    }

    /// `[start, end]` 구간의 거래일 수 (양 끝 포함).
    pub fn trading_days_between(&self, start: NaiveDate, end: NaiveDate) -> usize {
        if start > end {
            return 0;
        }
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_trading_day(*d))
            .count()
    }
}

/// 토요일/일요일인지 확인합니다.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
