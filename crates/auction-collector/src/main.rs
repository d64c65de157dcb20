//! Auction stock batch collector CLI.

use auction_collector::{modules, CollectorConfig, CollectorError, OffsetMode};
use auction_core::{init_logging, HolidayOverrides, LogConfig, LogFormat, TradingCalendar};
use auction_data::FinMindClient;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "auction-collector")]
#[command(about = "Taiwan auction stock price collector and roster join", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// 명단 파일 경로 (ROSTER_PATH 대신 사용)
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// 결과 디렉터리 (OUTPUT_DIR 대신 사용)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// 명단 스프레드시트 다운로드
    DownloadRoster,

    /// FinMind 일별 시세 / PER-PBR 수집
    CollectPrices {
        /// 처리할 최대 명단 행 수 (0 = 전체)
        #[arg(long)]
        max_rows: Option<usize>,
    },

    /// 명단 날짜 열에 종가 조인
    JoinRoster {
        /// 0이 아닌 헤더 오프셋의 조회 방식 (calendar, index)
        #[arg(long)]
        offset_mode: Option<String>,
    },

    /// 누락 거래일 보고서 생성
    MissingDates,

    /// 종목별 PER/PBR 특성 테이블 생성
    PerPbrFeatures,

    /// 전체 워크플로우 실행 (명단 → 수집 → 조인 → 보고서)
    RunAll,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    let format = cli
        .log_format
        .or_else(|| std::env::var("LOG_FORMAT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or_default();
    init_logging(LogConfig::new(format!("auction={}", cli.log_level)).with_format(format))?;

    tracing::info!("Auction Collector 시작");

    // 설정 로드
    let mut config = CollectorConfig::from_env()?;
    if let Some(roster) = cli.roster {
        config.roster.path = roster;
    }
    if let Some(output_dir) = cli.output_dir {
        config.paths.output_dir = output_dir;
    }
    tracing::debug!(
        roster = %config.roster.path.display(),
        price_dir = %config.paths.price_dir.display(),
        output_dir = %config.paths.output_dir.display(),
        "설정 로드 완료"
    );

    // 명령 실행
    match cli.command {
        Commands::DownloadRoster => {
            let stats = modules::download_roster(&config).await?;
            stats.log_summary("명단 다운로드");
        }
        Commands::CollectPrices { max_rows } => {
            if let Some(max_rows) = max_rows {
                config.roster.max_rows = max_rows;
            }
            let client = finmind_client(&config)?;
            let stats = modules::collect_prices(&config, &client).await?;
            stats.log_summary("시세 수집");
        }
        Commands::JoinRoster { offset_mode } => {
            if let Some(mode) = offset_mode {
                config.join.offset_mode = mode.parse::<OffsetMode>()?;
            }
            let calendar = load_calendar(&config);
            run_join(&config, &calendar)?;
        }
        Commands::MissingDates => {
            let calendar = load_calendar(&config);
            let stats = modules::report_missing_dates(&config, &calendar)?;
            stats.log_summary("누락 거래일 보고서");
        }
        Commands::PerPbrFeatures => {
            let stats = modules::build_features(&config)?;
            stats.log_summary("PER/PBR 특성");
        }
        Commands::RunAll => {
            tracing::info!("=== 전체 워크플로우 시작 ===");

            // 1. 명단 다운로드
            tracing::info!("Step 1/5: 명단 다운로드");
            let roster_stats = modules::download_roster(&config).await?;
            roster_stats.log_summary("명단 다운로드");

            // 2. 시세 수집
            tracing::info!("Step 2/5: 시세 수집");
            let client = finmind_client(&config)?;
            let collect_stats = modules::collect_prices(&config, &client).await?;
            collect_stats.log_summary("시세 수집");

            // 3. 명단 조인
            tracing::info!("Step 3/5: 명단 조인");
            let calendar = load_calendar(&config);
            let join_result = run_join(&config, &calendar);

            // 4. 누락 거래일 보고서
            tracing::info!("Step 4/5: 누락 거래일 보고서");
            let missing_stats = modules::report_missing_dates(&config, &calendar)?;
            missing_stats.log_summary("누락 거래일 보고서");

            // 5. PER/PBR 특성
            tracing::info!("Step 5/5: PER/PBR 특성");
            let feature_stats = modules::build_features(&config)?;
            feature_stats.log_summary("PER/PBR 특성");

            join_result?;
            tracing::info!("=== 전체 워크플로우 완료 ===");
        }
    }

    tracing::info!("Auction Collector 종료");

    Ok(())
}

/// 사용자 지정 휴장일을 읽어 캘린더를 만듭니다.
fn load_calendar(config: &CollectorConfig) -> TradingCalendar {
    let overrides = HolidayOverrides::load(&config.paths.holidays_path);
    tracing::info!(overrides = overrides.len(), "거래일 캘린더 준비");
    TradingCalendar::new(overrides)
}

fn finmind_client(config: &CollectorConfig) -> Result<FinMindClient, CollectorError> {
    let token = config.require_token()?;
    Ok(FinMindClient::new(Some(token.to_string()))?
        .with_base_url(&config.finmind.base_url)
        .with_max_retries(config.finmind.max_retries))
}

/// 명단 조인을 실행합니다. 종가를 찾은 종목이 하나도 없으면 에러.
fn run_join(config: &CollectorConfig, calendar: &TradingCalendar) -> Result<(), CollectorError> {
    let stats = modules::join_roster(config, calendar)?;
    stats.log_summary("명단 조인");

    if stats.nothing_resolved() {
        tracing::error!(rows = stats.rows, "종가를 찾은 종목이 없습니다");
        return Err(CollectorError::DataSource(
            "명단의 어떤 종목도 종가를 찾지 못했습니다".to_string(),
        ));
    }
    Ok(())
}
