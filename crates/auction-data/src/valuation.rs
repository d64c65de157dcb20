//! PER/PBR 테이블 읽기/쓰기.

use crate::csvio;
use crate::error::{DataError, Result};
use auction_core::{
    parse_date, parse_decimal, SecurityId, ValuationRecord, DATE_COLUMN, DIVIDEND_YIELD_COLUMN,
    PER_PBR_TABLE_HEADERS,
};
use std::path::Path;

/// PER/PBR 테이블을 읽습니다. 날짜를 해석할 수 없는 행은 버립니다.
pub fn read_valuation_csv(path: &Path, security: &SecurityId) -> Result<Vec<ValuationRecord>> {
    let text = csvio::read_text(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let find = |names: &[&str]| headers.iter().position(|h| names.contains(&h.trim()));
    let date_idx = find(&[DATE_COLUMN, "date"])
        .ok_or_else(|| DataError::InvalidData(format!("{}: 날짜 열 없음", path.display())))?;
    let yield_idx = find(&[DIVIDEND_YIELD_COLUMN, "dividend_yield"]);
    let per_idx = find(&["PER"]);
    let pbr_idx = find(&["PBR"]);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let Some(date) = row.get(date_idx).and_then(parse_date) else {
            continue;
        };
        let at = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(parse_decimal);
        records.push(ValuationRecord {
            date,
            security: security.clone(),
            dividend_yield: at(yield_idx),
            per: at(per_idx),
            pbr: at(pbr_idx),
        });
    }
    Ok(records)
}

/// PER/PBR 테이블을 기록합니다 (UTF-8 BOM, 원자적 교체).
pub fn write_valuation_csv(path: &Path, records: &[ValuationRecord]) -> Result<()> {
    csvio::write_csv_atomic(path, |w| {
        w.write_record(PER_PBR_TABLE_HEADERS)?;
        for record in records {
            w.write_record(record.to_row())?;
        }
        Ok(())
    })
}
