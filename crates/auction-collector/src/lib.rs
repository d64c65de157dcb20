//! Batch collector for Taiwan auction stocks.
//!
//! 이 crate는 명단 기반 배치 작업 바이너리를 제공합니다:
//! - 명단 스프레드시트 다운로드
//! - FinMind 일별 시세 / PER-PBR 수집
//! - 명단 날짜 열 종가 조인
//! - 누락 거래일 보고서, PER/PBR 특성 테이블

pub mod config;
pub mod error;
pub mod modules;
pub mod roster;
pub mod stats;

pub use config::{CollectorConfig, OffsetMode};
pub use error::{CollectorError, Result};
pub use roster::RosterTable;
pub use stats::{CollectionStats, JoinStats};
