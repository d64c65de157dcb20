//! 데이터 Provider 모듈.
//!
//! ## FinMind Open API
//! - `FinMindClient`: 대만 증시 일별 시세, PER/PBR 데이터

pub mod finmind;

pub use finmind::{FinMindClient, FinMindDataset, FinMindPer, FinMindPrice, FINMIND_BASE_URL};
