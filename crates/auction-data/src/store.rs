//! 가격 테이블 저장소.
//!
//! 디렉터리를 한 번 스캔해 `SecurityId → 테이블` 인덱스를 만들고,
//! 로드한 시계열은 실행 동안 종목별로 캐시합니다.

use crate::error::{DataError, Result};
use crate::series::PriceSeries;
use crate::table::{parse_table_name, TableKind};
use auction_core::SecurityId;
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 인덱스된 가격 테이블.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTableHandle {
    pub path: PathBuf,
    pub file_name: String,
    pub span: Option<(NaiveDate, NaiveDate)>,
}

impl PriceTableHandle {
    /// 후보 정렬 키: 넓은 구간 우선, 같으면 파일명 사전순.
    fn rank(&self) -> (Reverse<i64>, &str) {
        let width = self
            .span
            .map(|(start, end)| (end - start).num_days())
            .unwrap_or(-1);
        (Reverse(width), self.file_name.as_str())
    }
}

#[derive(Debug)]
enum CacheEntry {
    Loaded(Arc<PriceSeries>),
    Failed(String),
}

/// 종목별 가격 테이블 저장소.
#[derive(Debug)]
pub struct PriceStore {
    dir: PathBuf,
    index: HashMap<SecurityId, PriceTableHandle>,
    cache: HashMap<SecurityId, CacheEntry>,
}

impl PriceStore {
    /// 디렉터리를 스캔해 저장소를 엽니다.
    ///
    /// 디렉터리가 없으면 빈 저장소를 반환합니다 (모든 조회가 테이블 없음).
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            warn!(dir = %dir.display(), "가격 테이블 디렉터리 없음, 빈 저장소로 시작");
            return Ok(Self::from_handles(dir, Vec::new()));
        }

        let mut handles = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(name) = parse_table_name(&file_name) else {
                continue;
            };
            if name.kind != TableKind::Price {
                continue;
            }
            handles.push((
                name.security,
                PriceTableHandle {
                    path: entry.path(),
                    file_name,
                    span: name.span,
                },
            ));
        }

        let store = Self::from_handles(dir, handles);
        info!(dir = %store.dir.display(), tables = store.index.len(), "가격 테이블 인덱스 생성");
        Ok(store)
    }

    fn from_handles(dir: PathBuf, handles: Vec<(SecurityId, PriceTableHandle)>) -> Self {
        let mut grouped: BTreeMap<SecurityId, Vec<PriceTableHandle>> = BTreeMap::new();
        for (security, handle) in handles {
            grouped.entry(security).or_default().push(handle);
        }

        let mut index = HashMap::with_capacity(grouped.len());
        for (security, mut candidates) in grouped {
            candidates.sort_by(|a, b| a.rank().cmp(&b.rank()));
            if candidates.len() > 1 {
                warn!(
                    security = %security,
                    chosen = %candidates[0].file_name,
                    candidates = ?candidates.iter().map(|c| c.file_name.as_str()).collect::<Vec<_>>(),
                    "같은 종목의 가격 테이블이 여러 개, 가장 넓은 구간 선택"
                );
            }
            if let Some(chosen) = candidates.into_iter().next() {
                index.insert(security, chosen);
            }
        }

        Self {
            dir,
            index,
            cache: HashMap::new(),
        }
    }

    /// 스캔한 디렉터리.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 인덱스된 종목 수.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 종목의 테이블 정보.
    pub fn handle(&self, security: &SecurityId) -> Option<&PriceTableHandle> {
        self.index.get(security)
    }

    /// 파일명에 선언된 수집 구간.
    pub fn declared_span(&self, security: &SecurityId) -> Option<(NaiveDate, NaiveDate)> {
        self.handle(security).and_then(|h| h.span)
    }

    /// 인덱스된 종목 목록 (정렬됨).
    pub fn securities(&self) -> Vec<&SecurityId> {
        let mut ids: Vec<&SecurityId> = self.index.keys().collect();
        ids.sort();
        ids
    }

    /// 종목의 시계열을 로드합니다.
    ///
    /// 테이블이 없으면 `Ok(None)`. 구조적으로 읽을 수 없는 테이블은 `Err`이며,
    /// 실패도 캐시되어 같은 파일을 다시 해석하지 않습니다.
    pub fn load(&mut self, security: &SecurityId) -> Result<Option<Arc<PriceSeries>>> {
        if let Some(entry) = self.cache.get(security) {
            return match entry {
                CacheEntry::Loaded(series) => Ok(Some(Arc::clone(series))),
                CacheEntry::Failed(reason) => Err(DataError::InvalidData(reason.clone())),
            };
        }

        let Some(handle) = self.index.get(security) else {
            return Ok(None);
        };

        match PriceSeries::read_csv(&handle.path, security.clone()) {
            Ok(series) => {
                let series = Arc::new(series.with_declared_span(handle.span));
                debug!(
                    security = %security,
                    file = %handle.file_name,
                    records = series.len(),
                    "가격 테이블 로드"
                );
                self.cache
                    .insert(security.clone(), CacheEntry::Loaded(Arc::clone(&series)));
                Ok(Some(series))
            }
            Err(e) => {
                let reason = format!("{}: {}", handle.file_name, e);
                self.cache
                    .insert(security.clone(), CacheEntry::Failed(reason));
                Err(e)
            }
        }
    }

    /// 종목 시계열의 레코드 수. 테이블이 없거나 읽을 수 없으면 `None`.
    pub fn record_count(&mut self, security: &SecurityId) -> Option<usize> {
        self.load(security).ok().flatten().map(|s| s.len())
    }
}
