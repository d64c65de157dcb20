//! 통합 테스트 공통 도우미.

#![allow(dead_code)]

use auction_collector::config::{FinMindConfig, JoinConfig, PathConfig, RosterConfig};
use auction_collector::{CollectorConfig, OffsetMode};
use std::path::Path;

/// 임시 디렉터리 기준 설정.
pub fn config_for(root: &Path) -> CollectorConfig {
    CollectorConfig {
        finmind: FinMindConfig {
            token: Some("test-token".to_string()),
            base_url: "http://127.0.0.1:1".to_string(),
            request_delay_ms: 0,
            max_retries: 1,
        },
        roster: RosterConfig {
            url: "http://127.0.0.1:1/roster.csv".to_string(),
            download_path: root.join("auction_data.csv"),
            path: root.join("cleaned_auction_data.csv"),
            id_column: "證券代號".to_string(),
            fetch_id_column: "股票代號".to_string(),
            block_start: "申請日期".to_string(),
            block_end: "DateEnd+14".to_string(),
            max_rows: 0,
        },
        paths: PathConfig {
            price_dir: root.join("prices"),
            per_pbr_dir: root.join("PER_PBR"),
            output_dir: root.join("out"),
            holidays_path: root.join("holidays.csv"),
        },
        join: JoinConfig {
            offset_mode: OffsetMode::Calendar,
        },
    }
}

pub fn write_file(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, body).unwrap();
}
