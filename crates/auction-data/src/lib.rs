//! 가격 테이블 저장소 및 거래일 조회.
//!
//! 이 crate는 다음을 제공합니다:
//! - 가격 테이블 파일명 규칙과 CSV 입출력
//! - 종목별 가격 시계열 (`PriceSeries`)과 디렉터리 인덱스 (`PriceStore`)
//! - 거래일 조회기 (`TradingDateResolver`)
//! - FinMind API 클라이언트

pub mod csvio;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod series;
pub mod store;
pub mod table;
pub mod valuation;

pub use error::{DataError, Result};
pub use resolver::{ResolveMode, TradingDateResolver, PROBE_WINDOW_DAYS};
pub use series::{IndexLookup, PriceSeries};
pub use store::{PriceStore, PriceTableHandle};
pub use table::{parse_table_name, table_file_name, TableKind, TableName};
pub use valuation::{read_valuation_csv, write_valuation_csv};

// FinMind Provider 재내보내기
pub use provider::{FinMindClient, FinMindDataset};
