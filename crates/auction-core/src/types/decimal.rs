//! 가격 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;
use std::str::FromStr;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 0보다 큰지 확인합니다 (0과 음수는 `false`).
    fn is_strictly_positive(&self) -> bool;

    /// 지정된 소수점 자릿수로 반올림합니다 (0.05 → 0.1, 사사오입).
    fn round_half_up(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn is_strictly_positive(&self) -> bool {
        *self > Decimal::ZERO
    }

    fn round_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }
}

/// 테이블 셀 문자열을 Decimal로 변환합니다.
///
/// 천 단위 구분자(`,`)는 제거하고, 빈 셀이나 `--` 같은 자리표시자는 `None`.
pub fn parse_decimal(cell: &str) -> Option<Decimal> {
    let cleaned: String = cell.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// API 응답의 부동소수점 값을 Decimal로 변환합니다.
///
/// 가장 짧은 10진 표기(`15.3`)를 거쳐 변환하므로 이진 오차가 남지 않습니다.
/// NaN/무한대는 `None`.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up() {
        assert_eq!(dec!(12.25).round_half_up(1), dec!(12.3));
        assert_eq!(dec!(12.24).round_half_up(1), dec!(12.2));
    }

    #[test]
    fn test_is_strictly_positive_excludes_zero() {
        assert!(dec!(0.01).is_strictly_positive());
        assert!(dec!(15.5).is_strictly_positive());
        assert!(!Decimal::ZERO.is_strictly_positive());
        assert!(!dec!(0.00).is_strictly_positive());
        assert!(!dec!(-0.0).is_strictly_positive());
        assert!(!dec!(-3.2).is_strictly_positive());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("540.0"), Some(dec!(540.0)));
        assert_eq!(parse_decimal(" 1,234.5 "), Some(dec!(1234.5)));
        assert_eq!(parse_decimal("-3.5"), Some(dec!(-3.5)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("--"), None);
    }

    #[test]
    fn test_decimal_from_f64() {
        assert_eq!(decimal_from_f64(540.0), Some(dec!(540)));
        assert_eq!(decimal_from_f64(12.5), Some(dec!(12.5)));
        assert_eq!(decimal_from_f64(15.3), Some(dec!(15.3)));
        assert_eq!(decimal_from_f64(f64::INFINITY), None);
        assert_eq!(decimal_from_f64(f64::NAN), None);
    }
}
