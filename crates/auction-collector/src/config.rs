//! 환경변수 기반 설정 모듈.

use crate::error::CollectorError;
use crate::Result;
use auction_data::provider::FINMIND_BASE_URL;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 명단 스프레드시트 기본 주소 (CSV 게시 URL).
pub const DEFAULT_ROSTER_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSINLlSv4NcCszvA5XOPsuYCxZEk9_tBnhgLvyDkcG73QgFObITFtaZRQ492wlS53NPBlQi0AfPHMVh/pub?gid=1407177187&single=true&output=csv";

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// FinMind API 설정
    pub finmind: FinMindConfig,
    /// 명단 설정
    pub roster: RosterConfig,
    /// 파일 경로 설정
    pub paths: PathConfig,
    /// 명단 조인 설정
    pub join: JoinConfig,
}

/// FinMind API 설정
#[derive(Debug, Clone)]
pub struct FinMindConfig {
    /// API 토큰 (수집 명령에만 필요)
    pub token: Option<String>,
    /// API 기본 주소
    pub base_url: String,
    /// API 요청 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
    /// 최대 시도 횟수
    pub max_retries: u32,
}

/// 명단 설정
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// 스프레드시트 CSV 주소
    pub url: String,
    /// 원본 다운로드 경로
    pub download_path: PathBuf,
    /// 정리된 명단 경로 (조인/보고서 입력)
    pub path: PathBuf,
    /// 조인용 종목 코드 열
    pub id_column: String,
    /// 수집용 종목 코드 열
    pub fetch_id_column: String,
    /// 날짜 블록 시작 열
    pub block_start: String,
    /// 날짜 블록 끝 열
    pub block_end: String,
    /// 수집할 최대 행 수 (0 = 전체)
    pub max_rows: usize,
}

/// 파일 경로 설정
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// `[ID] START-END.csv` 가격 테이블 디렉터리
    pub price_dir: PathBuf,
    /// PER/PBR 테이블 디렉터리
    pub per_pbr_dir: PathBuf,
    /// 결과 디렉터리
    pub output_dir: PathBuf,
    /// 사용자 지정 휴장일 목록
    pub holidays_path: PathBuf,
}

/// 명단 조인 설정
#[derive(Debug, Clone)]
pub struct JoinConfig {
    /// 0이 아닌 오프셋의 조회 방식
    pub offset_mode: OffsetMode,
}

/// 헤더 오프셋 조회 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetMode {
    /// 달력 일수
    #[default]
    Calendar,
    /// 시계열 행 수
    Index,
}

impl FromStr for OffsetMode {
    type Err = CollectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "calendar" => Ok(Self::Calendar),
            "index" => Ok(Self::Index),
            other => Err(CollectorError::Config(format!(
                "JOIN_OFFSET_MODE는 calendar 또는 index여야 합니다: {}",
                other
            ))),
        }
    }
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let offset_mode = match std::env::var("JOIN_OFFSET_MODE") {
            Ok(value) => value.parse()?,
            Err(_) => OffsetMode::default(),
        };

        Ok(Self {
            finmind: FinMindConfig {
                token: std::env::var("FINMIND_TOKEN").ok().filter(|t| !t.is_empty()),
                base_url: env_var_string("FINMIND_BASE_URL", FINMIND_BASE_URL),
                request_delay_ms: env_var_parse("FINMIND_REQUEST_DELAY_MS", 500),
                max_retries: env_var_parse("FINMIND_MAX_RETRIES", 3),
            },
            roster: RosterConfig {
                url: env_var_string("ROSTER_URL", DEFAULT_ROSTER_URL),
                download_path: env_var_string("ROSTER_DOWNLOAD_PATH", "auction_data.csv").into(),
                path: env_var_string("ROSTER_PATH", "cleaned_auction_data.csv").into(),
                id_column: env_var_string("ROSTER_ID_COLUMN", "證券代號"),
                fetch_id_column: env_var_string("ROSTER_FETCH_ID_COLUMN", "股票代號"),
                block_start: env_var_string("ROSTER_BLOCK_START", "申請日期"),
                block_end: env_var_string("ROSTER_BLOCK_END", "DateEnd+14"),
                max_rows: env_var_parse("FETCH_MAX_ROWS", 0),
            },
            paths: PathConfig {
                price_dir: env_var_string("PRICE_DIR", ".").into(),
                per_pbr_dir: env_var_string("PER_PBR_DIR", "PER_PBR").into(),
                output_dir: env_var_string("OUTPUT_DIR", "auction_data_processed").into(),
                holidays_path: env_var_string("HOLIDAYS_PATH", "holidays.csv").into(),
            },
            join: JoinConfig { offset_mode },
        })
    }

    /// FinMind 토큰을 반환합니다 (없으면 설정 에러).
    pub fn require_token(&self) -> Result<&str> {
        self.finmind.token.as_deref().ok_or_else(|| {
            CollectorError::Config("FINMIND_TOKEN 환경변수가 설정되지 않았습니다".to_string())
        })
    }
}

impl FinMindConfig {
    /// API 요청 간 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 환경변수 문자열 (비어 있거나 없으면 기본값)
fn env_var_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_mode_parse() {
        assert_eq!("calendar".parse::<OffsetMode>().unwrap(), OffsetMode::Calendar);
        assert_eq!(" Index ".parse::<OffsetMode>().unwrap(), OffsetMode::Index);
        assert!("rows".parse::<OffsetMode>().is_err());
    }
}
