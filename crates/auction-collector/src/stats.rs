//! 수집/조인 통계 구조체.

use auction_core::{OutcomeKind, ResolutionOutcome, SecurityId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// 수집 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 총 시도 횟수
    pub total: usize,
    /// 성공 횟수
    pub success: usize,
    /// 에러 횟수
    pub errors: usize,
    /// 건너뛴 횟수 (이미 최신 데이터, 필수 값 누락)
    pub skipped: usize,
    /// 빈 데이터 (조회 성공, 데이터 없음)
    pub empty: usize,
    /// 기록한 총 행 수
    pub total_rows: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            skipped = self.skipped,
            empty = self.empty,
            total_rows = self.total_rows,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}

/// 명단 조인 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinStats {
    /// 명단 행 수
    pub rows: usize,
    /// 조회한 날짜 셀 수
    pub cells: usize,
    /// 빈 날짜 셀 수
    pub blank_cells: usize,
    /// 결과 종류별 셀 수
    pub outcomes: BTreeMap<OutcomeKind, usize>,
    /// 하나 이상의 셀에서 종가를 찾은 종목
    pub resolved_securities: BTreeSet<SecurityId>,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl JoinStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 조회 결과 하나를 기록
    pub fn record(&mut self, security: &SecurityId, outcome: &ResolutionOutcome) {
        self.cells += 1;
        *self.outcomes.entry(outcome.kind()).or_insert(0) += 1;
        if outcome.is_resolved() {
            self.resolved_securities.insert(security.clone());
        }
    }

    /// 종류별 셀 수
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.outcomes.get(&kind).copied().unwrap_or(0)
    }

    /// 명단에 행이 있는데 종가를 찾은 종목이 하나도 없는지 확인
    pub fn nothing_resolved(&self) -> bool {
        self.rows > 0 && self.resolved_securities.is_empty()
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        let outcomes = self
            .outcomes
            .iter()
            .map(|(kind, count)| format!("{}={}", kind, count))
            .collect::<Vec<_>>()
            .join(", ");

        tracing::info!(
            operation = operation,
            rows = self.rows,
            cells = self.cells,
            blank_cells = self.blank_cells,
            resolved = self.count(OutcomeKind::Resolved),
            resolved_securities = self.resolved_securities.len(),
            outcomes = %outcomes,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "조인 완료"
        );
    }
}
