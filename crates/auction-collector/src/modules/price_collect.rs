//! 일별 시세 / PER-PBR 수집 모듈.
//!
//! 명단의 각 행(`股票代號`, `DateStart`, `DateEnd`)에 대해 FinMind에서
//! 데이터를 받아 `[ID] START-END.csv` 테이블로 저장합니다. 파일이 이미 있고
//! 종료일 행을 포함하면 요청하지 않습니다.

use crate::roster::RosterTable;
use crate::{CollectionStats, CollectorConfig, Result};
use auction_core::{parse_date, SecurityId, DATE_COLUMN};
use auction_data::{
    csvio, table_file_name, write_valuation_csv, FinMindClient, PriceSeries, TableKind,
};
use chrono::NaiveDate;
use std::path::Path;
use std::time::Instant;

/// 수집 구간 시작 열.
pub const DATE_START_COLUMN: &str = "DateStart";
/// 수집 구간 끝 열.
pub const DATE_END_COLUMN: &str = "DateEnd";

/// 한 종목의 수집 대상.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectTarget {
    pub security: SecurityId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// 명단에서 수집 대상을 뽑습니다.
///
/// 종목 코드나 날짜가 비었거나 해석할 수 없는 행은 건너뛰고 `skipped`에
/// 집계합니다. `max_rows`가 0이면 모든 행을 처리합니다.
pub fn collect_targets(
    roster: &RosterTable,
    id_column: usize,
    max_rows: usize,
    stats: &mut CollectionStats,
) -> Result<Vec<CollectTarget>> {
    let start_column = roster.require_column(DATE_START_COLUMN)?;
    let end_column = roster.require_column(DATE_END_COLUMN)?;
    let limit = if max_rows == 0 {
        roster.len()
    } else {
        max_rows.min(roster.len())
    };

    let mut targets = Vec::with_capacity(limit);
    for row in 0..limit {
        let id = roster.cell(row, id_column);
        let start = parse_date(roster.cell(row, start_column));
        let end = parse_date(roster.cell(row, end_column));

        match (id.is_empty(), start, end) {
            (false, Some(start), Some(end)) if start <= end => targets.push(CollectTarget {
                security: SecurityId::new(id),
                start,
                end,
            }),
            _ => {
                stats.total += 1;
                stats.skipped += 1;
                tracing::warn!(
                    row = row + 1,
                    security = id,
                    start = roster.cell(row, start_column),
                    end = roster.cell(row, end_column),
                    "종목 코드 또는 수집 구간이 잘못된 행 건너뜀"
                );
            }
        }
    }
    Ok(targets)
}

/// 테이블 파일이 이미 `date` 행을 포함하는지 확인합니다.
pub fn table_contains_date(path: &Path, date: NaiveDate) -> bool {
    if !path.exists() {
        return false;
    }
    let text = match csvio::read_text(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "기존 테이블 확인 실패");
            return false;
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let Some(date_idx) = reader
        .headers()
        .ok()
        .and_then(|h| h.iter().position(|c| c.trim() == DATE_COLUMN || c.trim() == "date"))
    else {
        return false;
    };

    reader
        .records()
        .filter_map(|r| r.ok())
        .any(|r| r.get(date_idx).and_then(parse_date) == Some(date))
}

/// 일별 시세와 PER/PBR을 수집합니다.
pub async fn collect_prices(
    config: &CollectorConfig,
    client: &FinMindClient,
) -> Result<CollectionStats> {
    let started = Instant::now();
    let mut stats = CollectionStats::new();
    tracing::info!(roster = %config.roster.path.display(), "시세 수집 시작");

    let roster = RosterTable::read(&config.roster.path)?;
    let id_column = roster.find_column(&[
        config.roster.fetch_id_column.as_str(),
        config.roster.id_column.as_str(),
    ])?;
    let targets = collect_targets(&roster, id_column, config.roster.max_rows, &mut stats)?;
    tracing::info!(targets = targets.len(), skipped = stats.skipped, "수집 대상 확정");

    for (idx, target) in targets.iter().enumerate() {
        tracing::debug!(
            security = %target.security,
            progress = format!("{}/{}", idx + 1, targets.len()),
            "수집 시작"
        );

        let price_path = config.paths.price_dir.join(table_file_name(
            &target.security,
            target.start,
            target.end,
            TableKind::Price,
        ));
        if collect_one_price(client, target, &price_path, &mut stats).await {
            tokio::time::sleep(config.finmind.request_delay()).await;
        }

        let per_path = config.paths.per_pbr_dir.join(table_file_name(
            &target.security,
            target.start,
            target.end,
            TableKind::PerPbr,
        ));
        if collect_one_per_pbr(client, target, &per_path, &mut stats).await {
            tokio::time::sleep(config.finmind.request_delay()).await;
        }
    }

    stats.elapsed = started.elapsed();
    Ok(stats)
}

/// 시세 테이블 하나를 수집합니다. API를 호출했으면 `true`.
async fn collect_one_price(
    client: &FinMindClient,
    target: &CollectTarget,
    path: &Path,
    stats: &mut CollectionStats,
) -> bool {
    stats.total += 1;
    if table_contains_date(path, target.end) {
        stats.skipped += 1;
        tracing::debug!(security = %target.security, path = %path.display(), "종료일 데이터 존재, 건너뜀");
        return false;
    }

    match client
        .fetch_daily_prices(&target.security, target.start, target.end)
        .await
    {
        Ok(records) if records.is_empty() => {
            stats.empty += 1;
            tracing::info!(security = %target.security, "시세 데이터 없음");
        }
        Ok(records) => {
            let series = PriceSeries::from_records(target.security.clone(), records);
            match series.write_csv(path) {
                Ok(()) => {
                    stats.success += 1;
                    stats.total_rows += series.len();
                    tracing::info!(security = %target.security, rows = series.len(), path = %path.display(), "시세 저장");
                }
                Err(e) => {
                    stats.errors += 1;
                    tracing::error!(security = %target.security, error = %e, "시세 저장 실패");
                }
            }
        }
        Err(e) => {
            stats.errors += 1;
            tracing::error!(security = %target.security, error = %e, "시세 수집 실패");
        }
    }
    true
}

/// PER/PBR 테이블 하나를 수집합니다. API를 호출했으면 `true`.
async fn collect_one_per_pbr(
    client: &FinMindClient,
    target: &CollectTarget,
    path: &Path,
    stats: &mut CollectionStats,
) -> bool {
    stats.total += 1;
    if table_contains_date(path, target.end) {
        stats.skipped += 1;
        tracing::debug!(security = %target.security, path = %path.display(), "종료일 데이터 존재, 건너뜀");
        return false;
    }

    match client
        .fetch_per_pbr(&target.security, target.start, target.end)
        .await
    {
        Ok(records) if records.is_empty() => {
            stats.empty += 1;
            tracing::info!(security = %target.security, "PER/PBR 데이터 없음");
        }
        Ok(records) => match write_valuation_csv(path, &records) {
            Ok(()) => {
                stats.success += 1;
                stats.total_rows += records.len();
                tracing::info!(security = %target.security, rows = records.len(), path = %path.display(), "PER/PBR 저장");
            }
            Err(e) => {
                stats.errors += 1;
                tracing::error!(security = %target.security, error = %e, "PER/PBR 저장 실패");
            }
        },
        Err(e) => {
            stats.errors += 1;
            tracing::error!(security = %target.security, error = %e, "PER/PBR 수집 실패");
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_collect_targets_skips_incomplete_rows() {
        let roster = RosterTable::parse(
            "股票代號,DateStart,DateEnd\n\
             2330,2023/01/01,2023/06/01\n\
             6547,,2023/06/01\n\
             ,2023/01/01,2023/06/01\n\
             1234,2023/06/01,2023/01/01\n\
             8888,2023/02/01,2023/03/01\n",
        )
        .unwrap();

        let mut stats = CollectionStats::new();
        let targets = collect_targets(&roster, 0, 0, &mut stats).unwrap();
        assert_eq!(
            targets,
            vec![
                CollectTarget { security: "2330".into(), start: ymd(2023, 1, 1), end: ymd(2023, 6, 1) },
                CollectTarget { security: "8888".into(), start: ymd(2023, 2, 1), end: ymd(2023, 3, 1) },
            ]
        );
        assert_eq!(stats.skipped, 3);

        let mut limited = CollectionStats::new();
        assert_eq!(collect_targets(&roster, 0, 2, &mut limited).unwrap().len(), 1);
        assert_eq!(limited.skipped, 1);
    }

    #[test]
    fn test_table_contains_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("[2330] 2023-01-01-2023-06-01.csv");
        assert!(!table_contains_date(&path, ymd(2023, 6, 1)));

        std::fs::write(&path, "\u{feff}日期,收盤價\n2023-05-31,1\n2023-06-01,2\n").unwrap();
        assert!(table_contains_date(&path, ymd(2023, 6, 1)));
        assert!(!table_contains_date(&path, ymd(2023, 6, 2)));
    }
}
