//! 가격 조회를 위한 도메인 모델.

mod outcome;
mod price;
mod valuation;

pub use outcome::*;
pub use price::*;
pub use valuation::*;
