//! # Auction Core
//!
//! 경매(競拍) 종목 가격 보정 도구의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 워크스페이스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목 식별자 및 일별 시세 레코드
//! - 날짜 조회 결과 분류 (`ResolutionOutcome`)
//! - 대만 증시 거래일 캘린더 (법정 공휴일 + 사용자 지정 휴장일)
//! - 로깅 인프라

pub mod calendar;
pub mod domain;
pub mod logging;
pub mod types;

pub use calendar::{ClosureReason, HolidayOverrides, TradingCalendar};
pub use domain::*;
pub use logging::*;
pub use types::*;
