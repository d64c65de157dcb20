//! CSV 파일 입출력 유틸리티.
//!
//! 모든 테이블은 UTF-8(BOM 선택)로 읽고, BOM을 붙여 기록합니다.
//! 기록은 같은 디렉터리의 임시 파일에 쓴 뒤 이름을 바꿔 교체합니다.

use crate::error::{DataError, Result};
use std::path::{Path, PathBuf};

/// UTF-8 BOM.
pub const UTF8_BOM: &str = "\u{feff}";

/// 문자열 앞의 BOM을 제거합니다.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(UTF8_BOM).unwrap_or(text)
}

/// 파일을 UTF-8 문자열로 읽습니다 (BOM 제거).
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|e| {
        DataError::InvalidData(format!("{}: UTF-8이 아닌 파일 ({})", path.display(), e))
    })?;
    Ok(strip_bom(&text).to_string())
}

/// CSV 본문을 만들어 원자적으로 기록합니다.
///
/// `fill`이 실패하면 대상 파일은 건드리지 않습니다.
pub fn write_csv_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut csv::Writer<&mut Vec<u8>>) -> Result<()>,
{
    let mut buf = UTF8_BOM.as_bytes().to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);
        fill(&mut writer)?;
        writer.flush()?;
    }
    write_atomic(path, &buf)
}

/// 바이트를 임시 파일에 쓴 뒤 대상 경로로 이름을 바꿉니다.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    std::fs::write(&tmp, contents)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(DataError::Io(e));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_atomic_adds_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("table.csv");

        write_csv_atomic(&path, |w| {
            w.write_record(["日期", "收盤價"])?;
            w.write_record(["2023-06-01", "540.0"])?;
            Ok(())
        })
        .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM.as_bytes()));
        assert_eq!(read_text(&path).unwrap(), "日期,收盤價\n2023-06-01,540.0\n");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_failed_fill_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, "old").unwrap();

        let result = write_csv_atomic(&path, |_| Err(DataError::InvalidData("boom".into())));
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn test_read_text_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_text(&path), Err(DataError::InvalidData(_))));
    }
}
