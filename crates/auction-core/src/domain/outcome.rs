//! 날짜 → 종가 조회 결과.
//!
//! 모든 조회는 정확히 하나의 [`ResolutionOutcome`]으로 분류됩니다.
//! 내부에서는 태그된 값으로 다루고, 출력 테이블에 쓸 때만
//! [`ResolutionOutcome::display_value`]로 문자열화합니다.

use crate::types::{format_date, Price};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 범위 내 데이터 누락 표시.
pub const SENTINEL_NO_DATA: &str = "無資料";
/// 데이터 범위 이후 날짜 표시.
pub const SENTINEL_FUTURE: &str = "未來日期";
/// 주말 표시.
pub const SENTINEL_WEEKEND: &str = "週末";
/// 공휴일/휴장일 표시.
pub const SENTINEL_HOLIDAY: &str = "假日";
/// 가격 테이블 없음 표시.
pub const SENTINEL_NO_FILE: &str = "無檔案";
/// 날짜 입력 오류 표시.
pub const SENTINEL_INVALID_DATE: &str = "日期錯誤";
/// 인덱스 오프셋 범위 초과 표시.
pub const SENTINEL_OUT_OF_RANGE: &str = "超出範圍";

/// 단일 조회의 분류 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// 거래일 레코드를 찾음 (`date`는 실제로 매칭된 거래일)
    Resolved { date: NaiveDate, close: Price },
    /// 데이터 범위 안쪽(또는 이전)의 예상치 못한 누락
    RangeGapNoData,
    /// 데이터 범위 이후 날짜
    FutureDate,
    /// 주말
    Weekend,
    /// 법정 공휴일 또는 사용자 지정 휴장일
    Holiday,
    /// 해당 종목의 가격 테이블 없음
    NoFileForSecurity,
    /// 날짜를 해석할 수 없거나 인덱스 기준일이 시계열에 없음
    InvalidDateInput,
    /// 인덱스 오프셋이 시계열 범위를 벗어남
    OutOfBoundsOffset { position: i64, len: usize },
}

/// 통계 집계용 결과 종류 (값 없이 태그만).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Resolved,
    RangeGapNoData,
    FutureDate,
    Weekend,
    Holiday,
    NoFileForSecurity,
    InvalidDateInput,
    OutOfBoundsOffset,
}

impl ResolutionOutcome {
    /// 종가를 찾았는지 확인합니다.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// 주말/휴장일처럼 예상된 부재인지 확인합니다.
    pub fn is_expected_closure(&self) -> bool {
        matches!(self, Self::Weekend | Self::Holiday)
    }

    /// 찾은 종가를 반환합니다.
    pub fn close(&self) -> Option<Price> {
        match self {
            Self::Resolved { close, .. } => Some(*close),
            _ => None,
        }
    }

    /// 결과 종류를 반환합니다.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Resolved { .. } => OutcomeKind::Resolved,
            Self::RangeGapNoData => OutcomeKind::RangeGapNoData,
            Self::FutureDate => OutcomeKind::FutureDate,
            Self::Weekend => OutcomeKind::Weekend,
            Self::Holiday => OutcomeKind::Holiday,
            Self::NoFileForSecurity => OutcomeKind::NoFileForSecurity,
            Self::InvalidDateInput => OutcomeKind::InvalidDateInput,
            Self::OutOfBoundsOffset { .. } => OutcomeKind::OutOfBoundsOffset,
        }
    }

    /// 출력 테이블 셀에 기록할 값.
    ///
    /// 종가는 원본 테이블의 표기 그대로, 그 외에는 센티널 문자열입니다.
    pub fn display_value(&self) -> String {
        match self {
            Self::Resolved { close, .. } => close.to_string(),
            Self::RangeGapNoData => SENTINEL_NO_DATA.to_string(),
            Self::FutureDate => SENTINEL_FUTURE.to_string(),
            Self::Weekend => SENTINEL_WEEKEND.to_string(),
            Self::Holiday => SENTINEL_HOLIDAY.to_string(),
            Self::NoFileForSecurity => SENTINEL_NO_FILE.to_string(),
            Self::InvalidDateInput => SENTINEL_INVALID_DATE.to_string(),
            Self::OutOfBoundsOffset { .. } => SENTINEL_OUT_OF_RANGE.to_string(),
        }
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { date, close } => write!(f, "resolved({} @ {})", close, format_date(*date)),
            Self::OutOfBoundsOffset { position, len } => {
                write!(f, "out_of_bounds(position={}, len={})", position, len)
            }
            other => write!(f, "{}", other.kind()),
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resolved => "resolved",
            Self::RangeGapNoData => "range_gap_no_data",
            Self::FutureDate => "future_date",
            Self::Weekend => "weekend",
            Self::Holiday => "holiday",
            Self::NoFileForSecurity => "no_file_for_security",
            Self::InvalidDateInput => "invalid_date_input",
            Self::OutOfBoundsOffset => "out_of_bounds_offset",
        };
        f.write_str(name)
    }
}
