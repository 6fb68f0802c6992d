//! Deterministic fixed-point arithmetic.
//!
//! Inter-platform determinism (procedural generation, replay) requires
//! arithmetic that behaves identically regardless of floating-point unit
//! quirks. `Fixed` is a signed 64-bit fixed-point number with 16 fractional
//! bits (`FP_FACTOR = 65536`), used for charm effect magnitudes, the food
//! schedule tables, and net-enchant weapon math.

use serde::{Deserialize, Serialize};

/// Fixed-point scale: 16 fractional bits.
pub const FP_FACTOR: i64 = 65536;

/// A signed 64-bit fixed-point number, `FP_FACTOR` fractional units per 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fixed(i64);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);

    /// Wrap a raw fixed-point value (already scaled by `FP_FACTOR`).
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw scaled representation.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Convert an integer into fixed-point.
    pub const fn from_int(value: i64) -> Self {
        Self(value * FP_FACTOR)
    }

    /// Truncate toward zero back to an integer.
    pub const fn to_int(self) -> i64 {
        self.0 / FP_FACTOR
    }

    /// Fixed-point multiplication: `(a*b)/FP_FACTOR`, rounding toward zero.
    pub const fn mul(self, other: Fixed) -> Fixed {
        Fixed((self.0 * other.0) / FP_FACTOR)
    }

    /// Fixed-point division: `(a*FP_FACTOR)/b`, rounding toward zero.
    ///
    /// Panics on division by zero, matching the spec's "fails if lo > hi"
    /// style of documenting programmer-error preconditions rather than
    /// returning a sentinel.
    pub fn div(self, other: Fixed) -> Fixed {
        assert_ne!(other.0, 0, "Fixed::div by zero");
        Fixed((self.0 * FP_FACTOR) / other.0)
    }

    pub const fn add(self, other: Fixed) -> Fixed {
        Fixed(self.0 + other.0)
    }

    pub const fn sub(self, other: Fixed) -> Fixed {
        Fixed(self.0 - other.0)
    }
}

impl std::ops::Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed::add(self, rhs)
    }
}

impl std::ops::Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed::sub(self, rhs)
    }
}

impl std::ops::Mul for Fixed {
    type Output = Fixed;
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::mul(self, rhs)
    }
}

impl std::ops::Div for Fixed {
    type Output = Fixed;
    fn div(self, rhs: Fixed) -> Fixed {
        Fixed::div(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_round_trip() {
        assert_eq!(Fixed::from_int(7).to_int(), 7);
        assert_eq!(Fixed::from_int(-3).to_int(), -3);
    }

    #[test]
    fn multiplication_matches_integer_math() {
        let a = Fixed::from_int(3);
        let b = Fixed::from_int(4);
        assert_eq!((a * b).to_int(), 12);
    }

    #[test]
    fn division_truncates_toward_zero() {
        let a = Fixed::from_int(7);
        let b = Fixed::from_int(2);
        // 7/2 = 3.5, to_int truncates to 3
        assert_eq!((a / b).to_int(), 3);
    }

    #[test]
    fn raw_round_trip() {
        let a = Fixed::from_raw(123_456);
        assert_eq!(Fixed::from_raw(a.raw()), a);
    }
}
