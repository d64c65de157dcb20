//! 사용자 지정 휴장일 목록.
//!
//! 태풍 휴장, 춘절 전후 결제 전용일처럼 법정 공휴일 표로 알 수 없는
//! 휴장일을 보완합니다. 휴장일을 "추가"만 하며 기존 공휴일을 제거하지
//! 않습니다.

use crate::types::{format_date, parse_date};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// 사용자 지정 휴장일 집합.
///
/// 배치 시작 시 한 번 로드하고 이후에는 변경하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayOverrides {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayOverrides {
    /// 빈 집합을 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 날짜 목록에서 생성합니다.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// 텍스트에서 휴장일을 파싱합니다.
    ///
    /// 각 줄에서 쉼표/공백으로 나눈 토큰 중 첫 번째 날짜 형태 토큰만
    /// 사용합니다. 날짜가 없는 줄(헤더, 주석 등)은 건너뜁니다.
    pub fn parse(text: &str) -> Self {
        let mut dates = BTreeSet::new();
        let mut skipped = 0usize;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_start_matches('\u{feff}').trim();
            if line.is_empty() {
                continue;
            }

            let found = line
                .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .map(|token| token.trim_matches('"'))
                .find_map(parse_date);

            match found {
                Some(date) => {
                    dates.insert(date);
                }
                None => {
                    skipped += 1;
                    debug!(line = line_no + 1, content = line, "휴장일 줄 무시 (날짜 없음)");
                }
            }
        }

        if skipped > 0 {
            debug!(skipped, "날짜를 찾지 못한 휴장일 줄");
        }

        Self { dates }
    }

    /// 파일에서 휴장일을 로드합니다.
    ///
    /// 파일이 없으면 빈 집합을 반환합니다(안내 로그). 파일을 읽을 수 없거나
    /// 내용이 있는데 날짜가 하나도 없으면 경고를 남기고 빈 집합을 반환합니다.
    /// 어느 경우에도 배치를 중단하지 않습니다.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "휴장일 파일 없음, 추가 휴장일 없이 진행");
            return Self::empty();
        }

        match std::fs::read_to_string(path) {
            Ok(text) => {
                let overrides = Self::parse(&text);
                if overrides.is_empty() && !text.trim_start_matches('\u{feff}').trim().is_empty() {
                    warn!(
                        path = %path.display(),
                        "휴장일 파일에서 날짜를 하나도 찾지 못함, 파일 형식을 확인하세요"
                    );
                    return overrides;
                }
                info!(
                    path = %path.display(),
                    count = overrides.len(),
                    first = overrides.first().map(format_date).unwrap_or_default(),
                    last = overrides.last().map(format_date).unwrap_or_default(),
                    "사용자 지정 휴장일 로드 완료"
                );
                overrides
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "휴장일 파일을 읽을 수 없음, 추가 휴장일 없이 진행"
                );
                Self::empty()
            }
        }
    }

    /// 휴장일인지 확인합니다.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// 휴장일 수.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// 가장 이른 휴장일.
    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.iter().next().copied()
    }

    /// 가장 늦은 휴장일.
    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.iter().next_back().copied()
    }

    /// 날짜 순 반복자.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_keeps_first_date_token_per_line() {
        let text = "\u{feff}日期,說明\n2023-01-18,春節前封關\n2023/01/19, 2023-01-20\n颱風假 2023-08-03\n\nnot a date\n";
        let overrides = HolidayOverrides::parse(text);

        assert_eq!(overrides.len(), 3);
        assert!(overrides.contains(ymd(2023, 1, 18)));
        assert!(overrides.contains(ymd(2023, 1, 19)));
        assert!(!overrides.contains(ymd(2023, 1, 20)));
        assert!(overrides.contains(ymd(2023, 8, 3)));
    }

    #[test]
    fn test_parse_tolerates_quoted_fields() {
        let overrides = HolidayOverrides::parse("\"2024-10-03\",\"颱風\"\n");
        assert!(overrides.contains(ymd(2024, 10, 3)));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = HolidayOverrides::load(dir.path().join("holidays.csv"));
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holidays.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "2023-01-18").unwrap();
        writeln!(file, "2023-01-19").unwrap();
        drop(file);

        let overrides = HolidayOverrides::load(&path);
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.first(), Some(ymd(2023, 1, 18)));
        assert_eq!(overrides.last(), Some(ymd(2023, 1, 19)));
    }

    #[test]
    fn test_load_invalid_utf8_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holidays.csv");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x32]).unwrap();

        assert!(HolidayOverrides::load(&path).is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn load_with_logs(path: &Path) -> (HolidayOverrides, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let overrides = tracing::subscriber::with_default(subscriber, || HolidayOverrides::load(path));
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (overrides, output)
    }

    #[test]
    fn test_load_without_any_date_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holidays.csv");
        std::fs::write(&path, "\u{feff}日期,說明\n春節,封關\n").unwrap();

        let (overrides, output) = load_with_logs(&path);
        assert!(overrides.is_empty());
        assert!(output.contains("WARN"), "{}", output);
        assert!(output.contains("날짜를 하나도 찾지 못함"), "{}", output);
    }

    #[test]
    fn test_load_blank_file_does_not_warn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holidays.csv");
        std::fs::write(&path, "\u{feff}\n\n").unwrap();

        let (overrides, output) = load_with_logs(&path);
        assert!(overrides.is_empty());
        assert!(!output.contains("WARN"), "{}", output);
    }
}
