//! 명단 조인 통합 테스트.

mod common;

use auction_collector::modules::roster_join::{self, BLANK_DATE_CELL};
use auction_collector::{OffsetMode, RosterTable};
use auction_core::{
    HolidayOverrides, OutcomeKind, TradingCalendar, SENTINEL_FUTURE, SENTINEL_HOLIDAY, SENTINEL_INVALID_DATE,
    SENTINEL_NO_DATA, SENTINEL_NO_FILE, SENTINEL_OUT_OF_RANGE,
};
use common::{config_for, write_file};

const ROSTER: &str = "\u{feff}證券代號,公司名稱,申請日期,開標日期(T),撥券日(上市上櫃日) T+7,DateEnd,DateEnd+14,備註\n\
2330,台積電,2023/06/01,2023/06/03,,2023/06/01,,a\n\
9999,無檔案,2023/06/01,,,2023/06/01,,b\n\
2330,台積電,2023/07/01,2023/06/07,bogus,2023/06/13,,c\n";

const PRICES: &str = "日期,股票代碼,成交量,成交金額,開盤價,最高價,最低價,收盤價,漲跌幅,交易筆數\n\
2023-06-01,2330,1000,540000,538.0,541.0,535.0,540.0,2.0,10\n\
2023-06-02,2330,1000,545000,540.0,546.0,539.0,545.0,5.0,10\n\
2023-06-05,2330,1000,550000,545.0,551.0,544.0,550.0,5.0,10\n\
2023-06-15,2330,1000,560000,550.0,561.0,549.0,560.0,10.0,10\n";

fn setup() -> (tempfile::TempDir, auction_collector::CollectorConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    write_file(&config.roster.path, ROSTER);
    write_file(
        &config.paths.price_dir.join("[2330] 2023-06-01-2023-06-15.csv"),
        PRICES,
    );
    (dir, config)
}

fn row(table: &RosterTable, row: usize) -> Vec<&str> {
    table.rows[row].iter().map(String::as_str).collect()
}

#[test]
fn test_join_writes_prices_and_sentinels() {
    let (_dir, config) = setup();
    let calendar = TradingCalendar::new(HolidayOverrides::empty());

    let stats = roster_join::join_roster(&config, &calendar).unwrap();
    let output = RosterTable::read(&roster_join::output_path(&config)).unwrap();

    assert_eq!(
        output.headers.last().map(String::as_str),
        Some(roster_join::WORKING_DAYS_COLUMN)
    );
    assert_eq!(
        row(&output, 0),
        vec!["2330", "台積電", "540.0", "550.0", BLANK_DATE_CELL, "540.0", "560.0", "a", "4", "11"]
    );
    assert_eq!(
        row(&output, 1),
        vec![
            "9999",
            "無檔案",
            SENTINEL_NO_FILE,
            BLANK_DATE_CELL,
            BLANK_DATE_CELL,
            SENTINEL_NO_FILE,
            SENTINEL_NO_FILE,
            "b",
            SENTINEL_NO_DATA,
            SENTINEL_NO_DATA,
        ]
    );
    assert_eq!(
        row(&output, 2),
        vec![
            "2330",
            "台積電",
            SENTINEL_FUTURE,
            SENTINEL_NO_DATA,
            SENTINEL_INVALID_DATE,
            "560.0",
            SENTINEL_FUTURE,
            "c",
            "4",
            "11",
        ]
    );

    assert_eq!(stats.rows, 3);
    assert_eq!(stats.blank_cells, 3);
    assert_eq!(stats.cells, 12);
    assert_eq!(stats.count(OutcomeKind::Resolved), 5);
    assert_eq!(stats.count(OutcomeKind::NoFileForSecurity), 3);
    assert_eq!(stats.resolved_securities.len(), 1);
    assert!(!stats.nothing_resolved());
}

#[test]
fn test_join_is_idempotent() {
    let (_dir, config) = setup();
    let calendar = TradingCalendar::default();
    let path = roster_join::output_path(&config);

    roster_join::join_roster(&config, &calendar).unwrap();
    let first = std::fs::read(&path).unwrap();
    roster_join::join_roster(&config, &calendar).unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert!(first.starts_with("\u{feff}".as_bytes()));
}

#[test]
fn test_index_mode_for_offset_columns() {
    let (_dir, mut config) = setup();
    config.join.offset_mode = OffsetMode::Index;
    let calendar = TradingCalendar::default();

    roster_join::join_roster(&config, &calendar).unwrap();
    let output = RosterTable::read(&roster_join::output_path(&config)).unwrap();

    // DateEnd(2023-06-01)는 0번째 행, +14는 범위 밖
    assert_eq!(output.rows[0][6], SENTINEL_OUT_OF_RANGE);
    // 오프셋 0 열은 달력 모드 유지
    assert_eq!(output.rows[0][3], "550.0");
}

#[test]
fn test_override_holiday_in_join() {
    let (_dir, config) = setup();
    write_file(
        &config.roster.path,
        "證券代號,申請日期,DateEnd+14\n2330,2023/06/07,2023/06/01\n",
    );
    let calendar = TradingCalendar::new(HolidayOverrides::from_dates([
        chrono::NaiveDate::from_ymd_opt(2023, 6, 7).unwrap(),
    ]));

    roster_join::join_roster(&config, &calendar).unwrap();
    let output = RosterTable::read(&roster_join::output_path(&config)).unwrap();

    // DateEnd 열이 없으므로 DateEnd+14는 자기 셀의 날짜를 사용
    // 지정 휴장일만큼 거래일 수도 줄어듦
    assert_eq!(row(&output, 0), vec!["2330", SENTINEL_HOLIDAY, "540.0", "4", "10"]);
}

#[test]
fn test_nothing_resolved_is_reported() {
    let (_dir, config) = setup();
    write_file(
        &config.roster.path,
        "證券代號,申請日期,DateEnd+14\n9999,2023/06/01,2023/06/02\n",
    );

    let stats = roster_join::join_roster(&config, &TradingCalendar::default()).unwrap();
    assert!(stats.nothing_resolved());
    assert!(roster_join::output_path(&config).exists());
}

#[test]
fn test_missing_roster_column_is_error() {
    let (_dir, config) = setup();
    write_file(&config.roster.path, "代號,申請日期,DateEnd+14\n2330,2023/06/01,\n");
    assert!(roster_join::join_roster(&config, &TradingCalendar::default()).is_err());
}
