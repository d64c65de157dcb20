//! 거래일 조회기.
//!
//! (종목, 요청 날짜, 오프셋)을 종가 또는 분류된 부재 사유로 매핑합니다.
//! 조회는 실패하지 않으며 모든 경우가 [`ResolutionOutcome`] 하나로 귀결됩니다.
//!
//! # 달력 오프셋 모드
//!
//! 1. `target = date + offset일` 정확히 일치하는 레코드
//! 2. 없으면 `target+1`, `target+2` 순으로 탐색 (첫 일치 사용)
//! 3. 그래도 없으면 분류:
//!    - 데이터 범위 끝 + 탐색 구간보다 뒤 → `FutureDate`
//!    - 주말 → `Weekend`, 법정/지정 휴장일 → `Holiday`
//!    - 데이터 범위 끝보다 뒤 → `FutureDate`
//!    - 그 외 (범위 안, 범위 이전) → `RangeGapNoData`
//!
//! # 인덱스 오프셋 모드
//!
//! 기준일과 정확히 일치하는 행에서 `offset` 행만큼 이동합니다. 탐색 없음.

use crate::series::{IndexLookup, PriceSeries};
use crate::store::PriceStore;
use auction_core::{parse_date, ClosureReason, ResolutionOutcome, SecurityId, TradingCalendar};
use chrono::{NaiveDate, TimeDelta};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 정확히 일치하지 않을 때 앞으로 탐색하는 일수.
pub const PROBE_WINDOW_DAYS: i64 = 2;

/// 조회 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// 달력 기준 일수 오프셋
    CalendarOffset(i64),
    /// 시계열 행 기준 오프셋
    IndexOffset(i64),
}

impl fmt::Display for ResolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CalendarOffset(days) => write!(f, "calendar{:+}", days),
            Self::IndexOffset(rows) => write!(f, "index{:+}", rows),
        }
    }
}

/// 거래일 조회기.
pub struct TradingDateResolver<'a> {
    calendar: &'a TradingCalendar,
    store: PriceStore,
    reported_failures: HashSet<SecurityId>,
}

impl<'a> TradingDateResolver<'a> {
    pub fn new(calendar: &'a TradingCalendar, store: PriceStore) -> Self {
        Self {
            calendar,
            store,
            reported_failures: HashSet::new(),
        }
    }

    pub fn calendar(&self) -> &'a TradingCalendar {
        self.calendar
    }

    pub fn store(&self) -> &PriceStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PriceStore {
        &mut self.store
    }

    /// 날짜 문자열로 조회합니다.
    pub fn resolve(
        &mut self,
        security: &SecurityId,
        date_str: &str,
        mode: ResolveMode,
    ) -> ResolutionOutcome {
        match parse_date(date_str) {
            Some(date) => self.resolve_date(security, date, mode),
            None => {
                let outcome = ResolutionOutcome::InvalidDateInput;
                warn!(
                    security = %security,
                    date = date_str,
                    mode = %mode,
                    outcome = %outcome,
                    "날짜를 해석할 수 없음"
                );
                outcome
            }
        }
    }

    /// 달력 날짜로 조회합니다.
    pub fn resolve_date(
        &mut self,
        security: &SecurityId,
        date: NaiveDate,
        mode: ResolveMode,
    ) -> ResolutionOutcome {
        let Some(series) = self.series(security, date, mode) else {
            return ResolutionOutcome::NoFileForSecurity;
        };

        match mode {
            ResolveMode::CalendarOffset(days) => self.by_calendar(&series, date, days, mode),
            ResolveMode::IndexOffset(rows) => by_index(&series, date, rows, mode),
        }
    }

    /// 시계열을 가져옵니다. 없거나 읽을 수 없으면 로그를 남기고 `None`.
    fn series(
        &mut self,
        security: &SecurityId,
        date: NaiveDate,
        mode: ResolveMode,
    ) -> Option<Arc<PriceSeries>> {
        let outcome = ResolutionOutcome::NoFileForSecurity;
        match self.store.load(security) {
            Ok(Some(series)) => Some(series),
            Ok(None) => {
                warn!(
                    security = %security,
                    date = %date,
                    mode = %mode,
                    outcome = %outcome,
                    "가격 테이블 없음"
                );
                None
            }
            Err(e) => {
                if self.reported_failures.insert(security.clone()) {
                    error!(
                        security = %security,
                        date = %date,
                        mode = %mode,
                        outcome = %outcome,
                        error = %e,
                        "가격 테이블을 읽을 수 없음"
                    );
                } else {
                    warn!(
                        security = %security,
                        date = %date,
                        mode = %mode,
                        outcome = %outcome,
                        "가격 테이블을 읽을 수 없음 (이전 실패)"
                    );
                }
                None
            }
        }
    }

    fn by_calendar(
        &self,
        series: &PriceSeries,
        date: NaiveDate,
        days: i64,
        mode: ResolveMode,
    ) -> ResolutionOutcome {
        let security = series.security();
        let Some(target) = shift(date, days) else {
            let outcome = ResolutionOutcome::InvalidDateInput;
            warn!(security = %security, date = %date, mode = %mode, outcome = %outcome, "오프셋 적용 날짜가 범위를 벗어남");
            return outcome;
        };

        for probe in 0..=PROBE_WINDOW_DAYS {
            let Some(candidate) = shift(target, probe) else {
                break;
            };
            if let Some(record) = series.by_date(candidate) {
                let outcome = ResolutionOutcome::Resolved {
                    date: record.date,
                    close: record.close,
                };
                debug!(
                    security = %security,
                    date = %target,
                    mode = %mode,
                    probe = probe,
                    outcome = %outcome,
                    "종가 조회 성공"
                );
                return outcome;
            }
        }

        let covered_max = series.covered_range().map(|(_, max)| max);
        let beyond_window = covered_max
            .and_then(|max| shift(max, PROBE_WINDOW_DAYS))
            .is_some_and(|limit| target > limit);

        if beyond_window {
            let outcome = ResolutionOutcome::FutureDate;
            info!(security = %security, date = %target, mode = %mode, outcome = %outcome, "데이터 범위 이후 날짜");
            return outcome;
        }

        match self.calendar.closure(target) {
            Some(ClosureReason::Weekend) => {
                let outcome = ResolutionOutcome::Weekend;
                info!(security = %security, date = %target, mode = %mode, outcome = %outcome, "주말");
                outcome
            }
            Some(reason) => {
                let outcome = ResolutionOutcome::Holiday;
                info!(
                    security = %security,
                    date = %target,
                    mode = %mode,
                    reason = ?reason,
                    outcome = %outcome,
                    "휴장일"
                );
                outcome
            }
            None if covered_max.is_some_and(|max| target > max) => {
                let outcome = ResolutionOutcome::FutureDate;
                info!(security = %security, date = %target, mode = %mode, outcome = %outcome, "데이터 범위 이후 날짜");
                outcome
            }
            None => {
                let outcome = ResolutionOutcome::RangeGapNoData;
                warn!(
                    security = %security,
                    date = %target,
                    mode = %mode,
                    range = ?series.covered_range(),
                    outcome = %outcome,
                    "거래일이지만 데이터 없음"
                );
                outcome
            }
        }
    }
}

fn by_index(series: &PriceSeries, anchor: NaiveDate, rows: i64, mode: ResolveMode) -> ResolutionOutcome {
    let security = series.security();
    match series.by_index_offset(anchor, rows) {
        IndexLookup::Found(record) => {
            let outcome = ResolutionOutcome::Resolved {
                date: record.date,
                close: record.close,
            };
            debug!(security = %security, date = %anchor, mode = %mode, outcome = %outcome, "종가 조회 성공");
            outcome
        }
        IndexLookup::AnchorMissing => {
            let outcome = ResolutionOutcome::InvalidDateInput;
            warn!(security = %security, date = %anchor, mode = %mode, outcome = %outcome, "기준일이 시계열에 없음");
            outcome
        }
        IndexLookup::OutOfBounds { position, len } => {
            let outcome = ResolutionOutcome::OutOfBoundsOffset { position, len };
            warn!(security = %security, date = %anchor, mode = %mode, outcome = %outcome, "오프셋이 시계열 범위를 벗어남");
            outcome
        }
    }
}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}
