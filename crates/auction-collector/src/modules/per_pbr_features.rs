//! 종목별 PER/PBR 특성 테이블 모듈.
//!
//! `PER_PBR_DIR`의 `[ID] …-PER_PBR.csv` 테이블을 모두 읽어 종목별 평균
//! 배당수익률/PER/PBR을 계산합니다. 배당수익률은 모든 수치를, PER/PBR은
//! 양수만 평균에 포함하며 소수점 첫째 자리로 반올림합니다.

use crate::modules::missing_dates::roster_securities;
use crate::roster::RosterTable;
use crate::{CollectionStats, CollectorConfig, Result};
use auction_core::{DecimalExt, SecurityId, ValuationRecord};
use auction_data::{csvio, parse_table_name, read_valuation_csv, TableKind};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// 특성 테이블 파일명.
pub const FEATURES_FILE_NAME: &str = "Features-Company.csv";

/// 특성 테이블 헤더.
pub const FEATURES_HEADERS: [&str; 4] = ["股票代號", "股息殖利率", "PER", "PBR"];

/// 한 종목의 평균 지표.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFeatures {
    pub security: SecurityId,
    pub dividend_yield: Option<Decimal>,
    pub per: Option<Decimal>,
    pub pbr: Option<Decimal>,
}

impl CompanyFeatures {
    /// 지표 레코드에서 평균을 계산합니다.
    pub fn from_records(security: SecurityId, records: &[ValuationRecord]) -> Self {
        Self {
            dividend_yield: mean(records.iter().filter_map(|r| r.dividend_yield)),
            per: mean(records.iter().filter_map(|r| r.per).filter(|v| v.is_strictly_positive())),
            pbr: mean(records.iter().filter_map(|r| r.pbr).filter(|v| v.is_strictly_positive())),
            security,
        }
    }

    fn to_row(&self) -> [String; 4] {
        let fmt = |v: Option<Decimal>| v.map(|d| format!("{:.1}", d)).unwrap_or_default();
        [
            self.security.to_string(),
            fmt(self.dividend_yield),
            fmt(self.per),
            fmt(self.pbr),
        ]
    }
}

fn mean(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    let (sum, count) = values.fold((Decimal::ZERO, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    Some((sum / Decimal::from(count)).round_half_up(1))
}

/// PER/PBR 테이블을 종목별로 모읍니다 (파일명 순).
pub fn index_valuation_tables(dir: &Path) -> Result<HashMap<SecurityId, Vec<PathBuf>>> {
    let mut index: HashMap<SecurityId, Vec<PathBuf>> = HashMap::new();
    if !dir.exists() {
        tracing::warn!(dir = %dir.display(), "PER/PBR 디렉터리 없음");
        return Ok(index);
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if let Some(name) = parse_table_name(&file_name).filter(|n| n.kind == TableKind::PerPbr) {
            index.entry(name.security).or_default().push(entry.path());
        }
    }
    for paths in index.values_mut() {
        paths.sort();
    }
    Ok(index)
}

/// 종목별 특성 테이블을 생성합니다.
///
/// 명단의 모든 종목이 결과에 포함되며, 데이터가 없으면 빈 값입니다.
pub fn build_features(config: &CollectorConfig) -> Result<CollectionStats> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();
    tracing::info!("PER/PBR 특성 테이블 생성 시작");

    let roster = RosterTable::read(&config.roster.path)?;
    let id_column = roster.find_column(&[
        config.roster.id_column.as_str(),
        config.roster.fetch_id_column.as_str(),
    ])?;
    let securities = roster_securities(&roster, id_column);
    let tables = index_valuation_tables(&config.paths.per_pbr_dir)?;

    let mut features = Vec::with_capacity(securities.len());
    for security in securities {
        stats.total += 1;
        let mut records = Vec::new();
        for path in tables.get(&security).map(Vec::as_slice).unwrap_or_default() {
            match read_valuation_csv(path, &security) {
                Ok(mut rows) => records.append(&mut rows),
                Err(e) => {
                    stats.errors += 1;
                    tracing::warn!(security = %security, path = %path.display(), error = %e, "PER/PBR 테이블 읽기 실패");
                }
            }
        }

        if records.is_empty() {
            stats.empty += 1;
        } else {
            stats.success += 1;
        }
        features.push(CompanyFeatures::from_records(security, &records));
    }

    let path = config.paths.output_dir.join(FEATURES_FILE_NAME);
    csvio::write_csv_atomic(&path, |w| {
        w.write_record(FEATURES_HEADERS)?;
        for feature in &features {
            w.write_record(feature.to_row())?;
        }
        Ok(())
    })?;

    stats.total_rows = features.len();
    stats.elapsed = start.elapsed();
    tracing::info!(path = %path.display(), companies = features.len(), "PER/PBR 특성 테이블 저장");
    Ok(stats)
}
