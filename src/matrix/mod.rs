use std::collections::{HashMap, HashSet};

use bigdecimal::BigDecimal;
use num_traits::Zero;
use rayon::prelude::*;

use crate::{AlgebraError, MathContext};

pub mod dense;
pub mod sparse;

pub use dense::{DenseMatrix, DenseMutableMatrix};
pub use sparse::{SparseMatrix, SparseMutableMatrix};

mod factory {
    use bigdecimal::BigDecimal;

    /// Construction capability every matrix kind provides for its own kind.
    ///
    /// Not reachable from outside the crate, so immutable kinds stay immutable
    /// for callers while shared arithmetic can still populate fresh results.
    pub trait MatrixFactory: Sized {
        /// A `rows x columns` matrix of the receiver's kind with every cell
        /// equal to `default_value`. Fails when the kind cannot hold that shape.
        fn clone_empty(
            &self,
            rows: usize,
            columns: usize,
            default_value: BigDecimal,
        ) -> anyhow::Result<Self>;

        /// Writes one cell. Coordinates are already bounds checked by the caller.
        fn put(&mut self, row: usize, column: usize, value: BigDecimal);
    }
}

pub(crate) use factory::MatrixFactory;

/// Read contract shared by every matrix kind.
///
/// Arithmetic is written once here against the crate-internal factory capability
/// (`clone_empty` plus a raw cell write) and always returns a
/// new matrix of the receiver's kind: adding two immutable sparse matrices gives an
/// immutable sparse matrix, adding to a mutable dense matrix gives a mutable dense
/// matrix. Operands are never aliased into the result.
pub trait Matrix: MatrixFactory + Send + Sync {
    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    fn get(&self, row: usize, column: usize) -> anyhow::Result<BigDecimal>;

    /// Value of every cell not listed by [`Matrix::entries`].
    fn default_value(&self) -> BigDecimal;

    /// Explicitly stored cells as `(row, column, value)`, in no particular order.
    fn entries(&self) -> Box<dyn Iterator<Item = (usize, usize, &BigDecimal)> + '_>;

    fn add<O: Matrix>(&self, other: &O, mc: &MathContext) -> anyhow::Result<Self> {
        check_same_shape("add", self, other)?;
        combine(self, other, mc, |a, b| a + b)
    }

    fn subtract<O: Matrix>(&self, other: &O, mc: &MathContext) -> anyhow::Result<Self> {
        check_same_shape("subtract", self, other)?;
        combine(self, other, mc, |a, b| a - b)
    }

    fn multiply_scalar(&self, value: &BigDecimal, mc: &MathContext) -> anyhow::Result<Self> {
        let mut result = self.clone_empty(
            self.rows(),
            self.columns(),
            mc.multiply(&self.default_value(), value),
        )?;
        for (row, column, cell) in self.entries() {
            result.put(row, column, mc.multiply(cell, value));
        }
        Ok(result)
    }

    /// Matrix product `self x other`, a `self.rows() x other.columns()` matrix.
    ///
    /// Products are summed exactly and each result cell is rounded once, so the
    /// outcome does not depend on the order cells are visited in.
    fn multiply<O: Matrix>(&self, other: &O, mc: &MathContext) -> anyhow::Result<Self> {
        if self.columns() != other.rows() {
            return Err(AlgebraError::DimensionMismatch {
                operation: "multiply",
                left: (self.rows(), self.columns()),
                right: (other.rows(), other.columns()),
            }
            .into());
        }

        let rows = self.rows();
        let columns = other.columns();
        let mut result = self.clone_empty(rows, columns, BigDecimal::zero())?;

        if self.default_value().is_zero() && other.default_value().is_zero() {
            log::trace!("stored-entry product of {}x{} by {}x{}", rows, self.columns(), other.rows(), columns);
            for ((row, column), sum) in stored_entry_product(self, other) {
                result.put(row, column, mc.round(&sum));
            }
        } else {
            log::trace!("dense product of {}x{} by {}x{}", rows, self.columns(), other.rows(), columns);
            let computed = (0..rows)
                .into_par_iter()
                .map(|row| product_row(self, other, row, mc))
                .collect::<anyhow::Result<Vec<_>>>()?;
            for (row, values) in computed.into_iter().enumerate() {
                for (column, value) in values.into_iter().enumerate() {
                    result.put(row, column, value);
                }
            }
        }

        Ok(result)
    }

    fn transpose(&self) -> anyhow::Result<Self> {
        let mut result = self.clone_empty(self.columns(), self.rows(), self.default_value())?;
        for (row, column, cell) in self.entries() {
            result.put(column, row, cell.clone());
        }
        Ok(result)
    }
}

/// Write contract for mutable kinds. Single writer: callers serialize concurrent access.
pub trait MutableMatrix: Matrix {
    fn set(&mut self, row: usize, column: usize, value: BigDecimal) -> anyhow::Result<()>;

    /// Every cell becomes `value`; previously set cells are discarded.
    fn fill(&mut self, value: BigDecimal);
}

fn check_same_shape<A: Matrix, B: Matrix>(
    operation: &'static str,
    left: &A,
    right: &B,
) -> anyhow::Result<()> {
    if left.rows() != right.rows() || left.columns() != right.columns() {
        return Err(AlgebraError::DimensionMismatch {
            operation,
            left: (left.rows(), left.columns()),
            right: (right.rows(), right.columns()),
        }
        .into());
    }
    Ok(())
}

/// Applies `op` cell-wise, visiting only coordinates stored by either operand.
/// Every other coordinate takes the combined default value.
fn combine<A, B, F>(left: &A, right: &B, mc: &MathContext, op: F) -> anyhow::Result<A>
where
    A: Matrix,
    B: Matrix,
    F: Fn(&BigDecimal, &BigDecimal) -> BigDecimal,
{
    let default_value = mc.round(&op(&left.default_value(), &right.default_value()));
    let mut result = left.clone_empty(left.rows(), left.columns(), default_value)?;

    let coordinates: HashSet<(usize, usize)> = left
        .entries()
        .chain(right.entries())
        .map(|(row, column, _)| (row, column))
        .collect();

    for (row, column) in coordinates {
        let value = op(&left.get(row, column)?, &right.get(row, column)?);
        result.put(row, column, mc.round(&value));
    }
    Ok(result)
}

/// Exact sums of `left x right` over stored entries only. Valid when both
/// defaults are zero, since an unstored cell then contributes nothing.
fn stored_entry_product<A: Matrix, B: Matrix>(
    left: &A,
    right: &B,
) -> HashMap<(usize, usize), BigDecimal> {
    let mut right_rows: HashMap<usize, Vec<(usize, &BigDecimal)>> = HashMap::new();
    for (row, column, value) in right.entries() {
        right_rows.entry(row).or_default().push((column, value));
    }

    let mut sums: HashMap<(usize, usize), BigDecimal> = HashMap::new();
    for (row, inner, a) in left.entries() {
        if let Some(right_row) = right_rows.get(&inner) {
            for &(column, b) in right_row {
                *sums.entry((row, column)).or_insert_with(BigDecimal::zero) += a * b;
            }
        }
    }
    sums
}

fn product_row<A: Matrix, B: Matrix>(
    left: &A,
    right: &B,
    row: usize,
    mc: &MathContext,
) -> anyhow::Result<Vec<BigDecimal>> {
    (0..right.columns())
        .map(|column| {
            let mut sum = BigDecimal::zero();
            for inner in 0..left.columns() {
                sum += left.get(row, inner)? * right.get(inner, column)?;
            }
            Ok(mc.round(&sum))
        })
        .collect()
}
