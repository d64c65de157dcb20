//! 가격 테이블 파일명 규칙.
//!
//! 가격 테이블: `[2330] 2023-01-01-2023-06-01.csv`
//! PER/PBR 테이블: `[2330] 2023-01-01-2023-06-01-PER_PBR.csv`

use auction_core::{format_date, parse_date, SecurityId};
use chrono::NaiveDate;

/// PER/PBR 테이블 파일명 접미사.
pub const PER_PBR_SUFFIX: &str = "-PER_PBR";

const CSV_EXTENSION: &str = ".csv";

/// 테이블 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// 일별 시세
    Price,
    /// PER/PBR/배당수익률
    PerPbr,
}

/// 파일명에서 읽어낸 테이블 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    pub security: SecurityId,
    pub kind: TableKind,
    /// 파일명에 선언된 수집 구간 (해석 실패 시 `None`)
    pub span: Option<(NaiveDate, NaiveDate)>,
}

impl TableName {
    /// 선언 구간의 길이 (일). 구간을 모르면 `None`.
    pub fn span_days(&self) -> Option<i64> {
        self.span.map(|(start, end)| (end - start).num_days())
    }
}

/// 테이블 파일명을 만듭니다.
pub fn table_file_name(
    security: &SecurityId,
    start: NaiveDate,
    end: NaiveDate,
    kind: TableKind,
) -> String {
    let suffix = match kind {
        TableKind::Price => "",
        TableKind::PerPbr => PER_PBR_SUFFIX,
    };
    format!(
        "{} {}-{}{}{}",
        security.bracketed(),
        format_date(start),
        format_date(end),
        suffix,
        CSV_EXTENSION
    )
}

/// 파일명을 해석합니다.
///
/// `[ID]`로 시작하고 `.csv`로 끝나야 합니다. 구간 부분을 해석할 수 없어도
/// 식별자만으로 `TableName`을 반환합니다 (`span = None`).
pub fn parse_table_name(file_name: &str) -> Option<TableName> {
    let rest = file_name.strip_prefix('[')?;
    let close = rest.find(']')?;
    let id = &rest[..close];
    if id.is_empty() {
        return None;
    }

    let body = rest[close + 1..].strip_suffix(CSV_EXTENSION)?.trim();
    let (body, kind) = match body.strip_suffix(PER_PBR_SUFFIX) {
        Some(stripped) => (stripped, TableKind::PerPbr),
        None => (body, TableKind::Price),
    };

    Some(TableName {
        security: SecurityId::new(id),
        kind,
        span: parse_span(body),
    })
}

/// `YYYY-MM-DD-YYYY-MM-DD` 구간을 해석합니다.
fn parse_span(body: &str) -> Option<(NaiveDate, NaiveDate)> {
    if body.len() != 21 || !body.is_char_boundary(10) || body.as_bytes()[10] != b'-' {
        return None;
    }
    let start = parse_date(&body[..10])?;
    let end = parse_date(&body[11..])?;
    Some((start, end))
}
