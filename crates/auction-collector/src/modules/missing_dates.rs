//! 누락 거래일 보고서 모듈.
//!
//! 종목별 가격 테이블의 파일명 구간 안에서, 거래일인데 레코드가 없는 날짜를
//! 찾아 `missing_dates.csv`로 기록합니다 (헤더 없음, `ID,날짜,날짜,…`).

use crate::roster::RosterTable;
use crate::{CollectionStats, CollectorConfig, Result};
use auction_core::{format_date, SecurityId, TradingCalendar};
use auction_data::{csvio, PriceStore};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::time::Instant;

/// 보고서 파일명.
pub const MISSING_DATES_FILE_NAME: &str = "missing_dates.csv";

/// 한 종목의 누락 거래일.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDates {
    pub security: SecurityId,
    pub dates: Vec<NaiveDate>,
}

/// 명단 순서대로 종목별 누락 거래일을 찾습니다.
///
/// 테이블이 없거나 파일명 구간을 해석할 수 없는 종목은 건너뜁니다.
pub fn find_missing_dates(
    securities: &[SecurityId],
    store: &mut PriceStore,
    calendar: &TradingCalendar,
    stats: &mut CollectionStats,
) -> Vec<MissingDates> {
    let mut report = Vec::new();

    for security in securities {
        stats.total += 1;

        let Some((start, end)) = store.declared_span(security) else {
            stats.skipped += 1;
            tracing::debug!(security = %security, "가격 테이블 또는 구간 정보 없음");
            continue;
        };

        let series = match store.load(security) {
            Ok(Some(series)) => series,
            Ok(None) => {
                stats.skipped += 1;
                continue;
            }
            Err(e) => {
                stats.errors += 1;
                tracing::error!(security = %security, error = %e, "가격 테이블을 읽을 수 없음");
                continue;
            }
        };

        stats.success += 1;
        let dates: Vec<NaiveDate> = calendar
            .trading_days_in(start, end)
            .into_iter()
            .filter(|d| series.by_date(*d).is_none())
            .collect();

        if dates.is_empty() {
            stats.empty += 1;
        } else {
            tracing::debug!(security = %security, missing = dates.len(), "누락 거래일 발견");
            report.push(MissingDates {
                security: security.clone(),
                dates,
            });
        }
    }

    report
}

/// 명단의 종목 목록 (처음 등장 순서, 중복/빈 값 제외).
pub fn roster_securities(roster: &RosterTable, column: usize) -> Vec<SecurityId> {
    let mut seen = HashSet::new();
    (0..roster.len())
        .map(|row| roster.cell(row, column))
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string()))
        .map(SecurityId::new)
        .collect()
}

/// 누락 거래일 보고서를 생성합니다.
pub fn report_missing_dates(
    config: &CollectorConfig,
    calendar: &TradingCalendar,
) -> Result<CollectionStats> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();
    tracing::info!("누락 거래일 보고서 생성 시작");

    let roster = RosterTable::read(&config.roster.path)?;
    let id_column = roster.find_column(&[
        config.roster.id_column.as_str(),
        config.roster.fetch_id_column.as_str(),
    ])?;
    let securities = roster_securities(&roster, id_column);
    let mut store = PriceStore::open(&config.paths.price_dir)?;

    let report = find_missing_dates(&securities, &mut store, calendar, &mut stats);

    let path = config.paths.output_dir.join(MISSING_DATES_FILE_NAME);
    csvio::write_csv_atomic(&path, |w| {
        for entry in &report {
            let row = std::iter::once(entry.security.to_string())
                .chain(entry.dates.iter().map(|d| format_date(*d)));
            w.write_record(row)?;
        }
        Ok(())
    })?;

    stats.total_rows = report.len();
    stats.elapsed = start.elapsed();
    tracing::info!(path = %path.display(), securities = report.len(), "누락 거래일 보고서 저장");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_core::HolidayOverrides;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_find_missing_dates() {
        let dir = tempfile::tempdir().unwrap();
        // 2023-06-19(월) ~ 06-25(일): 20일 사용자 지정 휴장, 22일 端午節, 23일 調整放假
        // → 거래일 19, 21
        std::fs::write(
            dir.path().join("[2330] 2023-06-19-2023-06-25.csv"),
            "日期,收盤價\n2023-06-19,1\n2023-06-20,1\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("[6547] 2023-06-19-2023-06-20.csv"),
            "日期,收盤價\n2023-06-19,1\n2023-06-20,1\n",
        )
        .unwrap();

        let mut store = PriceStore::open(dir.path()).unwrap();
        let calendar = TradingCalendar::new(HolidayOverrides::from_dates([ymd(2023, 6, 20)]));
        let securities = vec![SecurityId::new("2330"), SecurityId::new("6547"), SecurityId::new("9999")];
        let mut stats = CollectionStats::new();

        let report = find_missing_dates(&securities, &mut store, &calendar, &mut stats);
        assert_eq!(
            report,
            vec![MissingDates {
                security: SecurityId::new("2330"),
                dates: vec![ymd(2023, 6, 21)],
            }]
        );
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.empty, 1);
    }

    #[test]
    fn test_roster_securities_dedup() {
        let roster = RosterTable::parse("證券代號,x\n2330,1\n,2\n6547,3\n2330,4\n").unwrap();
        assert_eq!(
            roster_securities(&roster, 0),
            vec![SecurityId::new("2330"), SecurityId::new("6547")]
        );
    }
}
