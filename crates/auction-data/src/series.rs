//! 단일 종목의 가격 시계열.
//!
//! 날짜 오름차순, 날짜 중복 없음 (먼저 나온 행 우선). 거래일 사이의 누락은
//! 허용합니다. 로드 후에는 변경하지 않습니다.

use crate::csvio;
use crate::error::{DataError, Result};
use auction_core::{
    parse_date, parse_decimal, PriceRecord, SecurityId, CLOSE_COLUMN, DATE_COLUMN,
    PRICE_TABLE_HEADERS,
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;
use tracing::debug;

/// 인덱스 오프셋 조회 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexLookup<'a> {
    /// 해당 위치의 레코드
    Found(&'a PriceRecord),
    /// 기준일이 시계열에 없음
    AnchorMissing,
    /// 계산된 위치가 `[0, len)` 밖
    OutOfBounds { position: i64, len: usize },
}

/// 가격 시계열.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSeries {
    security: SecurityId,
    records: Vec<PriceRecord>,
    declared_span: Option<(NaiveDate, NaiveDate)>,
}

/// 헤더에서 찾은 열 위치.
struct ColumnMap {
    date: usize,
    close: usize,
    volume: Option<usize>,
    trading_value: Option<usize>,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    change: Option<usize>,
    trade_count: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim() == *n))
        };

        let date = find(&[DATE_COLUMN, "date"])
            .ok_or_else(|| DataError::InvalidData(format!("날짜 열({}) 없음", DATE_COLUMN)))?;
        let close = find(&[CLOSE_COLUMN, "close"])
            .ok_or_else(|| DataError::InvalidData(format!("종가 열({}) 없음", CLOSE_COLUMN)))?;

        Ok(Self {
            date,
            close,
            volume: find(&["成交量", "Trading_Volume"]),
            trading_value: find(&["成交金額", "Trading_money"]),
            open: find(&["開盤價", "open"]),
            high: find(&["最高價", "max"]),
            low: find(&["最低價", "min"]),
            change: find(&["漲跌幅", "spread"]),
            trade_count: find(&["交易筆數", "Trading_turnover"]),
        })
    }
}

impl PriceSeries {
    /// 레코드로 시계열을 만듭니다. 날짜순 정렬 후 중복 날짜는 첫 행만 남깁니다.
    pub fn from_records(security: SecurityId, mut records: Vec<PriceRecord>) -> Self {
        // 안정 정렬이므로 같은 날짜는 원래 순서 유지
        records.sort_by_key(|r| r.date);
        records.dedup_by_key(|r| r.date);
        Self {
            security,
            records,
            declared_span: None,
        }
    }

    /// 파일명에 선언된 구간을 붙입니다.
    pub fn with_declared_span(mut self, span: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.declared_span = span;
        self
    }

    /// CSV 파일에서 시계열을 읽습니다.
    pub fn read_csv(path: &Path, security: SecurityId) -> Result<Self> {
        let text = csvio::read_text(path)?;
        Self::parse_csv(&text, security)
    }

    /// CSV 본문을 해석합니다.
    ///
    /// 날짜나 종가를 해석할 수 없는 행은 버립니다.
    pub fn parse_csv(text: &str, security: SecurityId) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(csvio::strip_bom(text).as_bytes());
        let columns = ColumnMap::from_headers(reader.headers()?)?;

        let mut records = Vec::new();
        let mut dropped = 0usize;
        for row in reader.records() {
            let row = row?;
            match parse_row(&row, &columns, &security) {
                Some(record) => records.push(record),
                None => {
                    dropped += 1;
                    debug!(
                        security = %security,
                        line = row.position().map(|p| p.line()).unwrap_or_default(),
                        "날짜/종가를 해석할 수 없는 행 제외"
                    );
                }
            }
        }

        if dropped > 0 {
            debug!(security = %security, dropped = dropped, kept = records.len(), "행 정리 완료");
        }

        Ok(Self::from_records(security, records))
    }

    /// 시계열을 CSV 파일로 기록합니다 (UTF-8 BOM, 원자적 교체).
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        csvio::write_csv_atomic(path, |w| {
            w.write_record(PRICE_TABLE_HEADERS)?;
            for record in &self.records {
                w.write_record(record.to_row())?;
            }
            Ok(())
        })
    }

    /// 종목 식별자.
    pub fn security(&self) -> &SecurityId {
        &self.security
    }

    /// 전체 레코드 (날짜 오름차순).
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// 레코드 수.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 위치로 레코드를 조회합니다.
    pub fn get(&self, position: usize) -> Option<&PriceRecord> {
        self.records.get(position)
    }

    /// 정확히 일치하는 날짜의 레코드.
    pub fn by_date(&self, date: NaiveDate) -> Option<&PriceRecord> {
        self.position_of(date).map(|i| &self.records[i])
    }

    /// 정확히 일치하는 날짜의 위치.
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.records.binary_search_by_key(&date, |r| r.date).ok()
    }

    /// 기준일 위치에서 `offset` 행만큼 이동한 레코드.
    pub fn by_index_offset(&self, anchor: NaiveDate, offset: i64) -> IndexLookup<'_> {
        let Some(index) = self.position_of(anchor) else {
            return IndexLookup::AnchorMissing;
        };

        let len = self.records.len();
        let position = (index as i64).saturating_add(offset);
        if position < 0 || position >= len as i64 {
            return IndexLookup::OutOfBounds { position, len };
        }
        IndexLookup::Found(&self.records[position as usize])
    }

    /// 시계열의 첫 날짜와 마지막 날짜.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// 파일명에 선언된 구간.
    pub fn declared_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.declared_span
    }

    /// 분류 기준 구간: 레코드가 있으면 실제 범위, 없으면 선언 구간.
    pub fn covered_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range().or(self.declared_span)
    }
}

fn parse_row(row: &csv::StringRecord, columns: &ColumnMap, security: &SecurityId) -> Option<PriceRecord> {
    let date = parse_date(row.get(columns.date)?)?;
    let close = parse_decimal(row.get(columns.close)?)?;

    let decimal_at = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(parse_decimal);
    let integer_at = |idx: Option<usize>| decimal_at(idx).and_then(|d| d.trunc().to_i64());

    Some(PriceRecord {
        date,
        security: security.clone(),
        volume: integer_at(columns.volume),
        trading_value: decimal_at(columns.trading_value),
        open: decimal_at(columns.open),
        high: decimal_at(columns.high),
        low: decimal_at(columns.low),
        close,
        change: decimal_at(columns.change),
        trade_count: integer_at(columns.trade_count),
    })
}
