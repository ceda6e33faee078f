use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::utils::decimal_digits;
use crate::AlgebraError;

/// Precision and rounding rule applied to a single arithmetic operation.
///
/// Every operation computes the exact result first and then rounds it to
/// `precision` significant digits using `rounding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathContext {
    precision: NonZeroU64,
    rounding: RoundingMode,
}

impl MathContext {
    pub fn new(precision: u64, rounding: RoundingMode) -> anyhow::Result<Self> {
        let precision = NonZeroU64::new(precision)
            .ok_or_else(|| AlgebraError::invalid_argument("precision must be at least 1 digit"))?;
        Ok(Self {
            precision,
            rounding,
        })
    }

    /// Context with the given precision and half-even rounding.
    pub fn with_precision(precision: u64) -> anyhow::Result<Self> {
        Self::new(precision, RoundingMode::HalfEven)
    }

    /// IEEE 754R Decimal32: 7 digits, half-even.
    pub fn decimal32() -> Self {
        Self::preset(7)
    }

    /// IEEE 754R Decimal64: 16 digits, half-even.
    pub fn decimal64() -> Self {
        Self::preset(16)
    }

    /// IEEE 754R Decimal128: 34 digits, half-even.
    pub fn decimal128() -> Self {
        Self::preset(34)
    }

    fn preset(precision: u64) -> Self {
        Self {
            precision: NonZeroU64::MIN.saturating_add(precision - 1),
            rounding: RoundingMode::HalfEven,
        }
    }

    pub fn precision(&self) -> u64 {
        self.precision.get()
    }

    pub fn rounding_mode(&self) -> RoundingMode {
        self.rounding
    }

    pub fn round(&self, value: &BigDecimal) -> BigDecimal {
        value.with_precision_round(self.precision, self.rounding)
    }

    pub fn add(&self, left: &BigDecimal, right: &BigDecimal) -> BigDecimal {
        self.round(&(left + right))
    }

    pub fn subtract(&self, left: &BigDecimal, right: &BigDecimal) -> BigDecimal {
        self.round(&(left - right))
    }

    pub fn multiply(&self, left: &BigDecimal, right: &BigDecimal) -> BigDecimal {
        self.round(&(left * right))
    }

    /// Quotient rounded to this context's precision.
    ///
    /// The integer division is carried two digits past the requested precision and
    /// a non-zero remainder is folded into one trailing sticky digit, so the final
    /// rounding sees the same discarded fraction it would see on the exact quotient.
    pub fn divide(&self, dividend: &BigDecimal, divisor: &BigDecimal) -> anyhow::Result<BigDecimal> {
        if divisor.is_zero() {
            return Err(AlgebraError::DivisionByZero.into());
        }
        if dividend.is_zero() {
            return Ok(BigDecimal::zero());
        }

        let (numerator, numerator_scale) = dividend.as_bigint_and_exponent();
        let (denominator, denominator_scale) = divisor.as_bigint_and_exponent();

        let precision = self.precision.get() as i64;
        let extra = (precision + 2 + decimal_digits(&denominator) - decimal_digits(&numerator)).max(0);

        let scaled = numerator * BigInt::from(10u8).pow(extra as u32);
        let quotient = &scaled / &denominator;
        let remainder = &scaled % &denominator;
        let scale = numerator_scale - denominator_scale + extra;

        let quotient = if remainder.is_zero() {
            BigDecimal::new(quotient, scale)
        } else {
            let sticky = if quotient.is_negative() { -1 } else { 1 };
            BigDecimal::new(quotient * BigInt::from(10u8) + BigInt::from(sticky), scale + 1)
        };
        Ok(self.round(&quotient))
    }
}

impl Default for MathContext {
    fn default() -> Self {
        Self::decimal128()
    }
}

fn rounding_mode_name(mode: RoundingMode) -> &'static str {
    match mode {
        RoundingMode::Up => "UP",
        RoundingMode::Down => "DOWN",
        RoundingMode::Ceiling => "CEILING",
        RoundingMode::Floor => "FLOOR",
        RoundingMode::HalfUp => "HALF_UP",
        RoundingMode::HalfDown => "HALF_DOWN",
        RoundingMode::HalfEven => "HALF_EVEN",
    }
}

fn parse_rounding_mode(name: &str) -> Option<RoundingMode> {
    let mode = match name {
        "UP" => RoundingMode::Up,
        "DOWN" => RoundingMode::Down,
        "CEILING" => RoundingMode::Ceiling,
        "FLOOR" => RoundingMode::Floor,
        "HALF_UP" => RoundingMode::HalfUp,
        "HALF_DOWN" => RoundingMode::HalfDown,
        "HALF_EVEN" => RoundingMode::HalfEven,
        _ => return None,
    };
    Some(mode)
}

impl fmt::Display for MathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "precision={} roundingMode={}",
            self.precision,
            rounding_mode_name(self.rounding)
        )
    }
}

/// Parses `precision=<digits> roundingMode=<MODE>`.
impl FromStr for MathContext {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AlgebraError::invalid_argument(format!("malformed math context: {:?}", s));

        let mut parts = s.split_whitespace();
        let precision = parts
            .next()
            .and_then(|part| part.strip_prefix("precision="))
            .and_then(|digits| digits.parse::<u64>().ok())
            .ok_or_else(malformed)?;
        let rounding = parts
            .next()
            .and_then(|part| part.strip_prefix("roundingMode="))
            .and_then(parse_rounding_mode)
            .ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed().into());
        }

        MathContext::new(precision, rounding)
    }
}
