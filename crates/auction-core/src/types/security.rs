//! 종목 식별자 정의.
//!
//! 대만 증시 종목 코드 (예: `2330`, `6547`, `00878`)를 감싸는 newtype입니다.
//! 모든 테이블의 조인 키로 사용되며, 대소문자와 공백을 구분하여 비교합니다.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// 종목 식별자.
///
/// 문자열을 그대로 보관하며 정규화하지 않습니다. 입력 정리(trim 등)는
/// 식별자를 만드는 쪽의 책임입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityId(String);

impl SecurityId {
    /// 새 종목 식별자를 생성합니다.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// 원본 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 빈 식별자인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 가격 테이블 파일명 앞부분 (`[2330]`)을 반환합니다.
    pub fn bracketed(&self) -> String {
        format!("[{}]", self.0)
    }
}

impl fmt::Display for SecurityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SecurityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SecurityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for SecurityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(SecurityId::new("2330"), SecurityId::from("2330"));
        assert_ne!(SecurityId::new("2330"), SecurityId::new(" 2330"));
        assert_ne!(SecurityId::new("abc"), SecurityId::new("ABC"));
    }

    #[test]
    fn test_bracketed() {
        assert_eq!(SecurityId::new("6547").bracketed(), "[6547]");
        assert_eq!(SecurityId::new("6547").to_string(), "6547");
    }
}
