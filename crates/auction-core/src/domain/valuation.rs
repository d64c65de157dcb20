//! 일별 가치평가 지표 (배당수익률, PER, PBR).

use crate::types::{format_date, SecurityId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// PER/PBR 테이블 헤더 (기록 순서).
pub const PER_PBR_TABLE_HEADERS: [&str; 5] = ["日期", "股票代碼", "股息殖利率", "PER", "PBR"];

/// 배당수익률 열 이름.
pub const DIVIDEND_YIELD_COLUMN: &str = "股息殖利率";

/// 한 종목의 하루치 가치평가 지표.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationRecord {
    pub date: NaiveDate,
    pub security: SecurityId,
    /// 배당수익률 (%)
    pub dividend_yield: Option<Decimal>,
    /// 주가수익비율
    pub per: Option<Decimal>,
    /// 주가순자산비율
    pub pbr: Option<Decimal>,
}

impl ValuationRecord {
    /// 테이블 한 행으로 변환합니다 (열 순서는 [`PER_PBR_TABLE_HEADERS`]).
    pub fn to_row(&self) -> [String; 5] {
        let opt = |v: &Option<Decimal>| v.map(|d| d.to_string()).unwrap_or_default();
        [
            format_date(self.date),
            self.security.to_string(),
            opt(&self.dividend_yield),
            opt(&self.per),
            opt(&self.pbr),
        ]
    }
}
