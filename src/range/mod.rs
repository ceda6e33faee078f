//! # Decimal ranges
//!
//! Finite arithmetic progressions of [`BigDecimal`] values. The element count is
//! computed once at construction from `(end - start) / step` under the caller's
//! [`MathContext`]; afterwards the range only counts down. A range can be split
//! into two contiguous halves that share nothing, which is what
//! [`parallel`] uses to fan the range out over rayon.

use std::iter::FusedIterator;

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{AlgebraError, MathContext};

pub mod parallel;

pub use parallel::ParDecimalRange;

/// Forward-only, splittable producer of `start, start + step, start + 2 * step, ...`.
#[derive(Debug, Clone)]
pub struct DecimalRange {
    value: BigDecimal,
    step: BigDecimal,
    remaining: u64,
    mc: MathContext,
}

impl DecimalRange {
    /// Range from `start` (inclusive) towards `end`, inclusive or exclusive of `end`.
    ///
    /// A step pointing away from `end` gives an empty range. When the span is not a
    /// whole number of steps the range still produces the partial last step, so
    /// with coarse precision the final element can land on or past `end`.
    pub fn new(
        start: BigDecimal,
        end: &BigDecimal,
        inclusive: bool,
        step: BigDecimal,
        mc: &MathContext,
    ) -> anyhow::Result<Self> {
        if step.is_zero() {
            return Err(AlgebraError::invalid_argument("invalid step: 0").into());
        }

        let distance = end - &start;
        let walking_away = if inclusive {
            signum(&distance) == -signum(&step)
        } else {
            signum(&distance) != signum(&step)
        };

        let remaining = if walking_away {
            0
        } else {
            element_count(&distance, &step, inclusive, mc)?
        };
        log::debug!(
            "decimal range from {} by {} ({} elements, {})",
            start,
            step,
            remaining,
            mc
        );

        Ok(Self::with_count(start, step, remaining, *mc))
    }

    fn with_count(start: BigDecimal, step: BigDecimal, remaining: u64, mc: MathContext) -> Self {
        Self {
            value: start,
            step,
            remaining,
            mc,
        }
    }

    /// Number of elements still to be produced.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    pub fn step(&self) -> &BigDecimal {
        &self.step
    }

    /// Produces the next element, or `None` once the range is exhausted.
    pub fn advance(&mut self) -> Option<BigDecimal> {
        if self.remaining == 0 {
            return None;
        }
        let next = self.mc.add(&self.value, &self.step);
        self.remaining -= 1;
        Some(std::mem::replace(&mut self.value, next))
    }

    /// Hands the second half of the remaining elements to a new range.
    ///
    /// The receiver keeps the first `remaining / 2` elements and the returned range
    /// starts at `current + step * (remaining / 2)`, both rounded under the context.
    /// Draining the receiver and then the returned range yields exactly the unsplit
    /// sequence as long as the accumulated values are exact under the context; with
    /// a precision too coarse for them, the second half can drift from the values
    /// repeated stepping would produce. Returns `None` when fewer than two elements
    /// remain.
    pub fn try_split(&mut self) -> Option<DecimalRange> {
        let first_half = self.remaining / 2;
        if first_half == 0 {
            return None;
        }
        let second_half = self.remaining - first_half;

        let offset = self.mc.multiply(&self.step, &BigDecimal::from(first_half));
        let second_start = self.mc.add(&self.value, &offset);
        self.remaining = first_half;
        log::trace!(
            "split decimal range: {} elements kept, {} handed off at {}",
            first_half,
            second_half,
            second_start
        );

        Some(Self::with_count(
            second_start,
            self.step.clone(),
            second_half,
            self.mc,
        ))
    }
}

impl Iterator for DecimalRange {
    type Item = BigDecimal;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for DecimalRange {}

fn signum(value: &BigDecimal) -> i8 {
    if value.is_positive() {
        1
    } else if value.is_negative() {
        -1
    } else {
        0
    }
}

fn element_count(
    distance: &BigDecimal,
    step: &BigDecimal,
    inclusive: bool,
    mc: &MathContext,
) -> anyhow::Result<u64> {
    let span = mc.divide(distance, step)?;
    // span is never negative here, so truncation is the floor
    let whole = span.with_scale_round(0, RoundingMode::Down);
    let has_remainder = span != whole;

    let whole = whole.to_u64().ok_or_else(|| {
        AlgebraError::invalid_argument(format!("range of {} steps is too long", span))
    })?;
    if has_remainder || inclusive {
        whole
            .checked_add(1)
            .ok_or_else(|| AlgebraError::invalid_argument("range element count overflows").into())
    } else {
        Ok(whole)
    }
}

/// Exclusive range `[start, end)` by `step`.
pub fn range(
    start: BigDecimal,
    end: &BigDecimal,
    step: BigDecimal,
    mc: &MathContext,
) -> anyhow::Result<DecimalRange> {
    DecimalRange::new(start, end, false, step, mc)
}

/// Inclusive range `[start, end]` by `step`.
pub fn range_closed(
    start: BigDecimal,
    end: &BigDecimal,
    step: BigDecimal,
    mc: &MathContext,
) -> anyhow::Result<DecimalRange> {
    DecimalRange::new(start, end, true, step, mc)
}

/// Exclusive range stepping by one towards `end` (downwards when `end < start`).
pub fn range_by_one(
    start: BigDecimal,
    end: &BigDecimal,
    mc: &MathContext,
) -> anyhow::Result<DecimalRange> {
    let step = unit_step(&start, end);
    range(start, end, step, mc)
}

/// Inclusive range stepping by one towards `end` (downwards when `end < start`).
pub fn range_closed_by_one(
    start: BigDecimal,
    end: &BigDecimal,
    mc: &MathContext,
) -> anyhow::Result<DecimalRange> {
    let step = unit_step(&start, end);
    range_closed(start, end, step, mc)
}

fn unit_step(start: &BigDecimal, end: &BigDecimal) -> BigDecimal {
    if end < start {
        -BigDecimal::one()
    } else {
        BigDecimal::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn decs(values: &[&str]) -> Vec<BigDecimal> {
        values.iter().map(|s| dec(s)).collect()
    }

    fn high() -> MathContext {
        MathContext::decimal128()
    }

    /// Drains `range` after splitting it recursively `depth` levels deep.
    fn split_collect(mut range: DecimalRange, depth: usize, out: &mut Vec<BigDecimal>) {
        if depth > 0 {
            if let Some(second) = range.try_split() {
                split_collect(range, depth - 1, out);
                split_collect(second, depth - 1, out);
                return;
            }
        }
        out.extend(range);
    }

    #[test]
    fn test_exclusive_integer_range() {
        init_logger();
        let values: Vec<_> = range(dec("0"), &dec("10"), dec("1"), &high()).unwrap().collect();
        assert_eq!(values, (0..10i32).map(BigDecimal::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_inclusive_integer_range() {
        let values: Vec<_> = range_closed(dec("0"), &dec("10"), dec("1"), &high())
            .unwrap()
            .collect();
        assert_eq!(values.len(), 11);
        assert_eq!(values.last(), Some(&dec("10")));
    }

    #[test]
    fn test_start_equals_end() {
        let exclusive = range(dec("5"), &dec("5"), dec("1"), &high()).unwrap();
        assert!(exclusive.is_empty());
        assert_eq!(exclusive.count(), 0);

        let inclusive: Vec<_> = range_closed(dec("5"), &dec("5"), dec("1"), &high())
            .unwrap()
            .collect();
        assert_eq!(inclusive, decs(&["5"]));
    }

    #[test]
    fn test_partial_last_step() {
        let mc = MathContext::with_precision(6).unwrap();
        let values: Vec<_> = range(dec("0"), &dec("1"), dec("0.3"), &mc).unwrap().collect();
        assert_eq!(values, decs(&["0", "0.3", "0.6", "0.9"]));

        let values: Vec<_> = range_closed(dec("0"), &dec("10"), dec("4"), &mc)
            .unwrap()
            .collect();
        assert_eq!(values, decs(&["0", "4", "8"]));
    }

    #[test]
    fn test_descending_range() {
        let values: Vec<_> = range(dec("10"), &dec("0"), dec("-2.5"), &high())
            .unwrap()
            .collect();
        assert_eq!(values, decs(&["10", "7.5", "5", "2.5"]));

        let values: Vec<_> = range_closed_by_one(dec("3"), &dec("0"), &high())
            .unwrap()
            .collect();
        assert_eq!(values, decs(&["3", "2", "1", "0"]));
    }

    #[test]
    fn test_walking_away_is_empty() {
        assert!(range(dec("0"), &dec("10"), dec("-1"), &high()).unwrap().is_empty());
        assert!(range_closed(dec("0"), &dec("10"), dec("-1"), &high())
            .unwrap()
            .is_empty());
        assert!(range(dec("0"), &dec("-1"), dec("0.5"), &high()).unwrap().is_empty());
        assert!(range_by_one(dec("2"), &dec("2"), &high()).unwrap().is_empty());
    }

    #[test]
    fn test_zero_step_rejected() {
        let err = range(dec("0"), &dec("1"), dec("0.000"), &high()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AlgebraError>(),
            Some(AlgebraError::InvalidArgument(_))
        ));
        assert!(range_closed(dec("0"), &dec("0"), dec("0"), &high()).is_err());
    }

    #[test]
    fn test_advance_counts_down() {
        let mut range = range_by_one(dec("1.5"), &dec("4"), &high()).unwrap();
        assert_eq!(range.remaining(), 3);
        assert_eq!(range.size_hint(), (3, Some(3)));
        assert_eq!(range.advance(), Some(dec("1.5")));
        assert_eq!(range.remaining(), 2);
        assert_eq!(range.next(), Some(dec("2.5")));
        assert_eq!(range.advance(), Some(dec("3.5")));
        assert_eq!(range.advance(), None);
        assert_eq!(range.next(), None);
        assert_eq!(range.remaining(), 0);
    }

    #[test]
    fn test_values_rounded_under_context() {
        let mc = MathContext::with_precision(2).unwrap();
        let values: Vec<_> = range(dec("9.8"), &dec("10.5"), dec("0.25"), &mc)
            .unwrap()
            .collect();
        // 9.8, 10.05 -> 10, 10.25 -> 10
        assert_eq!(values, decs(&["9.8", "10", "10"]));
    }

    #[test]
    fn test_split_halves() {
        let mut first = range(dec("0"), &dec("5"), dec("1"), &high()).unwrap();
        let second = first.try_split().unwrap();
        assert_eq!(first.remaining(), 2);
        assert_eq!(second.remaining(), 3);
        assert_eq!(first.collect::<Vec<_>>(), decs(&["0", "1"]));
        assert_eq!(second.collect::<Vec<_>>(), decs(&["2", "3", "4"]));
    }

    #[test]
    fn test_split_refused_below_two() {
        let mut single = range_closed(dec("1"), &dec("1"), dec("1"), &high()).unwrap();
        assert!(single.try_split().is_none());
        assert_eq!(single.remaining(), 1);

        let mut empty = range(dec("1"), &dec("1"), dec("1"), &high()).unwrap();
        assert!(empty.try_split().is_none());
    }

    #[test]
    fn test_split_after_partial_consumption() {
        let mut first = range(dec("0"), &dec("2"), dec("0.25"), &high()).unwrap();
        first.advance();
        first.advance();
        let second = first.try_split().unwrap();
        let mut values: Vec<_> = first.collect();
        values.extend(second);
        assert_eq!(values, decs(&["0.5", "0.75", "1", "1.25", "1.5", "1.75"]));
    }

    #[test]
    fn test_split_under_coarse_precision() {
        // Accumulated values are not exact at two digits, so only the first half
        // is guaranteed to match stepping; the element count is always preserved.
        let mc = MathContext::with_precision(2).unwrap();
        let unsplit: Vec<_> = range(dec("-3"), &dec("7.1"), dec("0.37"), &mc).unwrap().collect();

        let mut first = range(dec("-3"), &dec("7.1"), dec("0.37"), &mc).unwrap();
        let second = first.try_split().unwrap();
        let kept = first.remaining() as usize;
        assert_eq!(kept + second.remaining() as usize, unsplit.len());

        let first_values: Vec<_> = first.collect();
        assert_eq!(first_values, unsplit[..kept]);
        assert_eq!(second.count(), unsplit.len() - kept);
    }

    #[test]
    fn test_recursive_split_preserves_sequence() {
        for (start, end, step) in [("0", "100", "1"), ("-3", "7.1", "0.37"), ("50", "-50", "-3.125")] {
            let unsplit: Vec<_> = range(dec(start), &dec(end), dec(step), &high()).unwrap().collect();
            for depth in 1..8 {
                let mut split = Vec::new();
                split_collect(
                    range(dec(start), &dec(end), dec(step), &high()).unwrap(),
                    depth,
                    &mut split,
                );
                assert_eq!(split, unsplit, "{}..{} by {} at depth {}", start, end, step, depth);
            }
        }
    }
}
