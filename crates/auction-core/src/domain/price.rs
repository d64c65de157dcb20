//! 일별 시세 레코드.
//!
//! FinMind `TaiwanStockPrice` 데이터셋의 한 행에 대응합니다. 가격 테이블의
//! 열 순서는 [`PRICE_TABLE_HEADERS`]를 따릅니다.

use crate::types::{Price, SecurityId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 가격 테이블 헤더 (기록 순서).
pub const PRICE_TABLE_HEADERS: [&str; 10] = [
    "日期",
    "股票代碼",
    "成交量",
    "成交金額",
    "開盤價",
    "最高價",
    "最低價",
    "收盤價",
    "漲跌幅",
    "交易筆數",
];

/// 날짜 열 이름.
pub const DATE_COLUMN: &str = "日期";

/// 종가 열 이름.
pub const CLOSE_COLUMN: &str = "收盤價";

/// 한 종목의 하루치 시세.
///
/// 조회 엔진은 `date`와 `close`만 사용하며, 나머지 필드는 테이블을
/// 다시 기록할 때 원본을 보존하기 위해 유지합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// 거래일
    pub date: NaiveDate,
    /// 종목 코드
    pub security: SecurityId,
    /// 거래량 (주)
    pub volume: Option<i64>,
    /// 거래대금
    pub trading_value: Option<Decimal>,
    /// 시가
    pub open: Option<Price>,
    /// 고가
    pub high: Option<Price>,
    /// 저가
    pub low: Option<Price>,
    /// 종가
    pub close: Price,
    /// 전일 대비
    pub change: Option<Decimal>,
    /// 체결 건수
    pub trade_count: Option<i64>,
}

impl PriceRecord {
    /// 날짜와 종가만으로 레코드를 생성합니다.
    pub fn new(security: SecurityId, date: NaiveDate, close: Price) -> Self {
        Self {
            date,
            security,
            volume: None,
            trading_value: None,
            open: None,
            high: None,
            low: None,
            close,
            change: None,
            trade_count: None,
        }
    }

    /// 테이블 한 행으로 변환합니다 (열 순서는 [`PRICE_TABLE_HEADERS`]).
    pub fn to_row(&self) -> [String; 10] {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        [
            crate::types::format_date(self.date),
            self.security.to_string(),
            opt(&self.volume),
            opt(&self.trading_value),
            opt(&self.open),
            opt(&self.high),
            opt(&self.low),
            self.close.to_string(),
            opt(&self.change),
            opt(&self.trade_count),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_row_keeps_blank_optional_fields() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let mut record = PriceRecord::new(SecurityId::new("2330"), date, dec!(540.0));
        record.volume = Some(12_345);

        let row = record.to_row();
        assert_eq!(row[0], "2023-06-01");
        assert_eq!(row[1], "2330");
        assert_eq!(row[2], "12345");
        assert_eq!(row[3], "");
        assert_eq!(row[7], "540.0");
        assert_eq!(row.len(), PRICE_TABLE_HEADERS.len());
    }
}
