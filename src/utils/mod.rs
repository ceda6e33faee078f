use num_bigint::BigInt;
use num_traits::Zero;

use crate::AlgebraError;

/// Fails with `OutOfBounds` unless `row < rows` and `column < columns`.
pub(crate) fn check_bounds(
    rows: usize,
    columns: usize,
    row: usize,
    column: usize,
) -> anyhow::Result<()> {
    if row >= rows || column >= columns {
        return Err(AlgebraError::OutOfBounds {
            row,
            column,
            rows,
            columns,
        }
        .into());
    }
    Ok(())
}

/// Number of cells in a `rows x columns` matrix, rejecting overflow.
pub(crate) fn cell_count(rows: usize, columns: usize) -> anyhow::Result<usize> {
    rows.checked_mul(columns).ok_or_else(|| {
        AlgebraError::invalid_argument(format!("matrix of {}x{} cells overflows", rows, columns))
            .into()
    })
}

/// Count of decimal digits in the magnitude of `value` (zero has one digit).
pub(crate) fn decimal_digits(value: &BigInt) -> i64 {
    if value.is_zero() {
        return 1;
    }
    value.magnitude().to_str_radix(10).len() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_bounds() {
        assert!(check_bounds(2, 3, 1, 2).is_ok());
        let err = check_bounds(2, 3, 2, 0).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AlgebraError>(),
            Some(&AlgebraError::OutOfBounds {
                row: 2,
                column: 0,
                rows: 2,
                columns: 3
            })
        );
        // Nothing is in bounds for an empty matrix
        assert!(check_bounds(0, 0, 0, 0).is_err());
    }

    #[test]
    fn test_cell_count_overflow() {
        assert_eq!(cell_count(4, 5).unwrap(), 20);
        assert!(cell_count(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_decimal_digits() {
        assert_eq!(decimal_digits(&BigInt::from(0)), 1);
        assert_eq!(decimal_digits(&BigInt::from(9)), 1);
        assert_eq!(decimal_digits(&BigInt::from(-12345)), 5);
        assert_eq!(decimal_digits(&BigInt::from(100000)), 6);
    }
}
