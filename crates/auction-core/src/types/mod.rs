//! 워크스페이스 전반에서 사용되는 공통 타입.

mod date;
mod decimal;
mod security;

pub use date::*;
pub use decimal::*;
pub use security::*;
