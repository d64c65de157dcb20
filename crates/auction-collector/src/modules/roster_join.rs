//! 명단 날짜 열 → 종가 조인 모듈.
//!
//! 명단의 날짜 블록(`申請日期` … `DateEnd+14`)의 각 셀을 해당 날짜의 종가
//! 또는 부재 사유 표시로 바꾸고, 종목별 `資料總數`/`總工作天數` 열을 붙입니다.

use crate::config::OffsetMode;
use crate::roster::RosterTable;
use crate::{CollectorConfig, JoinStats, Result};
use auction_core::{security_span, SecurityId, TradingCalendar, SENTINEL_NO_DATA};
use auction_data::{PriceStore, ResolveMode, TradingDateResolver};
use std::path::PathBuf;
use std::time::Instant;

/// 조인 결과 파일명.
pub const OUTPUT_FILE_NAME: &str = "updated_cleaned_auction_data.csv";
/// 종목 시계열 레코드 수 열.
pub const RECORD_COUNT_COLUMN: &str = "資料總數";
/// 파일명 구간의 거래일 수 열.
pub const WORKING_DAYS_COLUMN: &str = "總工作天數";
/// 빈 날짜 셀 표시.
pub const BLANK_DATE_CELL: &str = "無日期";

/// 조인 옵션.
#[derive(Debug, Clone)]
pub struct JoinOptions {
    pub id_column: String,
    pub block_start: String,
    pub block_end: String,
    pub offset_mode: OffsetMode,
}

impl JoinOptions {
    pub fn from_config(config: &CollectorConfig) -> Self {
        Self {
            id_column: config.roster.id_column.clone(),
            block_start: config.roster.block_start.clone(),
            block_end: config.roster.block_end.clone(),
            offset_mode: config.join.offset_mode,
        }
    }
}

/// 날짜 열 하나의 조회 계획.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumn {
    /// 결과를 쓸 열
    pub column: usize,
    /// 날짜를 읽을 열
    pub source: usize,
    /// 적용할 오프셋
    pub offset: i64,
}

impl DateColumn {
    fn mode(&self, offset_mode: OffsetMode) -> ResolveMode {
        match (self.offset, offset_mode) {
            (0, _) => ResolveMode::CalendarOffset(0),
            (n, OffsetMode::Calendar) => ResolveMode::CalendarOffset(n),
            (n, OffsetMode::Index) => ResolveMode::IndexOffset(n),
        }
    }
}

/// 헤더 끝의 `+N`/`-N` 표기를 해석합니다 (`DateEnd+14` → `("DateEnd", 14)`).
pub fn parse_offset_marker(header: &str) -> Option<(&str, i64)> {
    let pos = header.rfind(|c: char| c == '+' || c == '-')?;
    let digits = &header[pos + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let base = header[..pos].trim_end();
    if base.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    let offset = if header[pos..].starts_with('-') { -value } else { value };
    Some((base, offset))
}

/// 날짜 블록의 열별 조회 계획을 만듭니다.
///
/// 오프셋 표기의 앞부분이 명단의 다른 열 이름이면 그 열의 날짜에 오프셋을
/// 적용하고, 아니면 헤더 전체를 일반 이름으로 보고 자기 셀의 날짜를 씁니다.
pub fn plan_date_columns(roster: &RosterTable, options: &JoinOptions) -> Result<Vec<DateColumn>> {
    let start = roster.require_column(&options.block_start)?;
    let end = roster.require_column(&options.block_end)?;
    if start > end {
        return Err(crate::CollectorError::Roster(format!(
            "날짜 블록 순서가 잘못되었습니다: '{}'({}) > '{}'({})",
            options.block_start, start, options.block_end, end
        )));
    }

    let plan = (start..=end)
        .map(|column| {
            let header = &roster.headers[column];
            match parse_offset_marker(header)
                .and_then(|(base, offset)| roster.column(base).map(|source| (source, offset)))
            {
                Some((source, offset)) => DateColumn { column, source, offset },
                None => DateColumn { column, source: column, offset: 0 },
            }
        })
        .collect();
    Ok(plan)
}

/// 명단 테이블에 종가를 조인합니다.
///
/// 날짜는 항상 입력 명단에서 읽으므로, 블록 안의 열을 기준으로 하는
/// 오프셋 열도 덮어쓰기 전의 날짜를 사용합니다.
pub fn join_roster_table(
    roster: &RosterTable,
    resolver: &mut TradingDateResolver<'_>,
    options: &JoinOptions,
) -> Result<(RosterTable, JoinStats)> {
    let plan = plan_date_columns(roster, options)?;
    let id_column = roster.require_column(&options.id_column)?;

    let mut output = roster.clone();
    let count_column = output.ensure_column(RECORD_COUNT_COLUMN);
    let days_column = output.ensure_column(WORKING_DAYS_COLUMN);

    let mut stats = JoinStats::new();
    stats.rows = roster.len();

    for row in 0..roster.len() {
        let security = SecurityId::new(roster.cell(row, id_column));
        let _span = security_span!("roster_row", security).entered();

        for date_column in &plan {
            let date_str = roster.cell(row, date_column.source);
            let value = if date_str.is_empty() {
                stats.blank_cells += 1;
                BLANK_DATE_CELL.to_string()
            } else {
                let outcome = resolver.resolve(&security, date_str, date_column.mode(options.offset_mode));
                stats.record(&security, &outcome);
                outcome.display_value()
            };
            output.rows[row][date_column.column] = value;
        }

        let working_days = resolver
            .store()
            .declared_span(&security)
            .map(|(start, end)| resolver.calendar().trading_days_between(start, end));
        let record_count = resolver.store_mut().record_count(&security);

        output.rows[row][count_column] = display_count(record_count);
        output.rows[row][days_column] = display_count(working_days);
    }

    Ok((output, stats))
}

fn display_count(value: Option<usize>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| SENTINEL_NO_DATA.to_string())
}

/// 명단 조인을 실행하고 결과 파일을 기록합니다.
pub fn join_roster(config: &CollectorConfig, calendar: &TradingCalendar) -> Result<JoinStats> {
    let start = Instant::now();
    tracing::info!(roster = %config.roster.path.display(), "명단 조인 시작");

    let roster = RosterTable::read(&config.roster.path)?;
    let store = PriceStore::open(&config.paths.price_dir)?;
    let mut resolver = TradingDateResolver::new(calendar, store);
    let options = JoinOptions::from_config(config);

    let (output, mut stats) = join_roster_table(&roster, &mut resolver, &options)?;

    let output_path = output_path(config);
    output.write(&output_path)?;
    tracing::info!(path = %output_path.display(), rows = output.len(), "조인 결과 저장");

    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// 조인 결과 파일 경로.
pub fn output_path(config: &CollectorConfig) -> PathBuf {
    config.paths.output_dir.join(OUTPUT_FILE_NAME)
}
