//! 명단 스프레드시트 다운로드 모듈.

use crate::error::CollectorError;
use crate::roster::RosterTable;
use crate::{CollectionStats, CollectorConfig, Result};
use auction_data::csvio;
use std::time::{Duration, Instant};

/// 게시된 스프레드시트 CSV를 내려받아 원본과 정리본을 저장합니다.
///
/// 원본은 `ROSTER_DOWNLOAD_PATH`에 받은 그대로, 정리본(셀 공백 제거, 빈 행
/// 제거)은 `ROSTER_PATH`에 기록합니다. CSV로 해석할 수 없으면 정리본을
/// 쓰지 않고 에러를 반환합니다.
pub async fn download_roster(config: &CollectorConfig) -> Result<CollectionStats> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();
    stats.total = 1;

    tracing::info!(url = %config.roster.url, "명단 다운로드 시작");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;
    let response = client.get(&config.roster.url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(CollectorError::DataSource(format!(
            "명단 다운로드 실패: {}",
            status
        )));
    }

    let bytes = response.bytes().await?;
    let text = String::from_utf8(bytes.to_vec())
        .map_err(|e| CollectorError::DataSource(format!("명단이 UTF-8이 아닙니다: {}", e)))?;

    csvio::write_atomic(&config.roster.download_path, text.as_bytes())?;
    tracing::info!(path = %config.roster.download_path.display(), bytes = text.len(), "명단 원본 저장");

    let roster = RosterTable::parse(&text)?;
    roster.write(&config.roster.path)?;
    tracing::info!(
        path = %config.roster.path.display(),
        rows = roster.len(),
        columns = roster.headers.len(),
        "명단 정리본 저장"
    );

    stats.success = 1;
    stats.total_rows = roster.len();
    stats.elapsed = start.elapsed();
    Ok(stats)
}
