//! 경매 종목 명단 테이블.
//!
//! 명단은 열 구성이 고정되지 않은 스프레드시트이므로 헤더와 문자열 셀
//! 그대로 다룹니다. 모든 행은 헤더 길이에 맞춰 채우거나 자릅니다.

use crate::error::CollectorError;
use crate::Result;
use auction_data::csvio;
use std::path::Path;

/// 명단 테이블.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RosterTable {
    /// 파일에서 명단을 읽습니다 (UTF-8, BOM 선택).
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CollectorError::Roster(format!(
                "명단 파일이 없습니다: {}",
                path.display()
            )));
        }
        let text = csvio::read_text(path)?;
        Self::parse(&text)
    }

    /// CSV 본문을 해석합니다.
    ///
    /// 셀 앞뒤 공백은 제거하고, 모든 셀이 빈 행은 버립니다.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(csvio::strip_bom(text).as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(CollectorError::Roster("명단에 헤더가 없습니다".to_string()));
        }

        let width = headers.len();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
            if row.iter().all(|c| c.is_empty()) {
                continue;
            }
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// 명단을 기록합니다 (UTF-8 BOM, 원자적 교체).
    pub fn write(&self, path: &Path) -> Result<()> {
        csvio::write_csv_atomic(path, |w| {
            w.write_record(&self.headers)?;
            for row in &self.rows {
                w.write_record(row)?;
            }
            Ok(())
        })?;
        Ok(())
    }

    /// 열 위치를 찾습니다.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 열 위치를 찾고, 없으면 명단 에러를 반환합니다.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| CollectorError::Roster(format!("명단에 '{}' 열이 없습니다", name)))
    }

    /// 후보 열 이름 중 처음 존재하는 열을 찾습니다.
    pub fn find_column(&self, candidates: &[&str]) -> Result<usize> {
        candidates
            .iter()
            .find_map(|name| self.column(name))
            .ok_or_else(|| {
                CollectorError::Roster(format!("명단에 종목 코드 열이 없습니다: {:?}", candidates))
            })
    }

    /// 셀 값 (범위 밖이면 빈 문자열).
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 열을 끝에 추가하고 위치를 반환합니다. 이미 있으면 기존 위치.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_pads() {
        let text = "\u{feff}證券代號, 申請日期 ,備註\n 2330 ,2023/06/01\n,,\n6547,2023/05/02,x\n";
        let roster = RosterTable::parse(text).unwrap();

        assert_eq!(roster.headers, vec!["證券代號", "申請日期", "備註"]);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.rows[0], vec!["2330", "2023/06/01", ""]);
        assert_eq!(roster.cell(1, 2), "x");
        assert_eq!(roster.cell(9, 9), "");
    }

    #[test]
    fn test_ensure_column() {
        let mut roster = RosterTable::parse("a,b\n1,2\n").unwrap();
        assert_eq!(roster.ensure_column("b"), 1);
        assert_eq!(roster.ensure_column("c"), 2);
        assert_eq!(roster.rows[0], vec!["1", "2", ""]);
        assert!(roster.require_column("zzz").is_err());
        assert_eq!(roster.find_column(&["x", "a"]).unwrap(), 0);
        assert!(roster.find_column(&["x", "y"]).is_err());
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        let roster = RosterTable::parse("證券代號,名稱\n2330,\"台積電, 晶圓\"\n").unwrap();
        roster.write(&path).unwrap();
        assert_eq!(RosterTable::read(&path).unwrap(), roster);
    }
}
