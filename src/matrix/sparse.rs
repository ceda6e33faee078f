//! # Sparse decimal matrices
//!
//! Cells live in a `(row, column) -> value` map with one fallback `default_value`
//! for every coordinate that has no entry. The map never holds an entry equal to
//! the current default: writes of the default evict the coordinate instead, and
//! `fill` clears the map before switching the default. Changing the default
//! therefore never leaves stale entries behind, and `fill` costs the same for a
//! 10x10 matrix as for a 10^6x10^6 one.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use num_traits::Zero;

use super::{Matrix, MatrixFactory, MutableMatrix};
use crate::utils::{cell_count, check_bounds};
use crate::AlgebraError;

#[derive(Debug, Clone)]
struct SparseStore {
    rows: usize,
    columns: usize,
    data: HashMap<(usize, usize), BigDecimal>,
    default_value: BigDecimal,
}

impl SparseStore {
    fn empty(rows: usize, columns: usize, default_value: BigDecimal) -> Self {
        Self {
            rows,
            columns,
            data: HashMap::new(),
            default_value,
        }
    }

    fn from_values(rows: usize, columns: usize, values: Vec<BigDecimal>) -> anyhow::Result<Self> {
        let cells = cell_count(rows, columns)?;
        if !values.is_empty() && values.len() != cells {
            return Err(AlgebraError::invalid_argument(format!(
                "{} values given for a {}x{} matrix",
                values.len(),
                rows,
                columns
            ))
            .into());
        }

        let mut store = Self::empty(rows, columns, BigDecimal::zero());
        for (index, value) in values.into_iter().enumerate() {
            store.put(index / columns, index % columns, value);
        }
        Ok(store)
    }

    fn from_fn<F>(rows: usize, columns: usize, mut value_fn: F) -> anyhow::Result<Self>
    where
        F: FnMut(usize, usize) -> BigDecimal,
    {
        cell_count(rows, columns)?;
        let mut store = Self::empty(rows, columns, BigDecimal::zero());
        for row in 0..rows {
            for column in 0..columns {
                store.put(row, column, value_fn(row, column));
            }
        }
        Ok(store)
    }

    fn get(&self, row: usize, column: usize) -> anyhow::Result<BigDecimal> {
        check_bounds(self.rows, self.columns, row, column)?;
        Ok(self
            .data
            .get(&(row, column))
            .unwrap_or(&self.default_value)
            .clone())
    }

    fn put(&mut self, row: usize, column: usize, value: BigDecimal) {
        if value == self.default_value {
            self.data.remove(&(row, column));
        } else {
            self.data.insert((row, column), value);
        }
    }

    fn set(&mut self, row: usize, column: usize, value: BigDecimal) -> anyhow::Result<()> {
        check_bounds(self.rows, self.columns, row, column)?;
        self.put(row, column, value);
        Ok(())
    }

    fn fill(&mut self, value: BigDecimal) {
        self.data.clear();
        self.default_value = value;
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (usize, usize, &BigDecimal)> + '_> {
        Box::new(
            self.data
                .iter()
                .map(|(&(row, column), value)| (row, column, value)),
        )
    }
}

/// Immutable sparse matrix. Safe to share between threads; never changes after construction.
#[derive(Debug, Clone)]
pub struct SparseMatrix(SparseStore);

/// Sparse matrix with in-place `set` and `fill`.
#[derive(Debug, Clone)]
pub struct SparseMutableMatrix(SparseStore);

macro_rules! sparse_matrix_kind {
    ($kind:ident) => {
        impl $kind {
            /// Builds a matrix from row-major `values`; an empty vector gives all zeros.
            pub fn new(rows: usize, columns: usize, values: Vec<BigDecimal>) -> anyhow::Result<Self> {
                SparseStore::from_values(rows, columns, values).map($kind)
            }

            /// Builds a matrix by evaluating `value_fn(row, column)` for every cell.
            pub fn from_fn<F>(rows: usize, columns: usize, value_fn: F) -> anyhow::Result<Self>
            where
                F: FnMut(usize, usize) -> BigDecimal,
            {
                SparseStore::from_fn(rows, columns, value_fn).map($kind)
            }

            pub fn zeros(rows: usize, columns: usize) -> Self {
                $kind(SparseStore::empty(rows, columns, BigDecimal::zero()))
            }

            /// Number of explicitly stored entries (cells differing from the default).
            pub fn stored_entries(&self) -> usize {
                self.0.data.len()
            }
        }

        impl MatrixFactory for $kind {
            fn clone_empty(
                &self,
                rows: usize,
                columns: usize,
                default_value: BigDecimal,
            ) -> anyhow::Result<Self> {
                Ok($kind(SparseStore::empty(rows, columns, default_value)))
            }

            fn put(&mut self, row: usize, column: usize, value: BigDecimal) {
                self.0.put(row, column, value);
            }
        }

        impl Matrix for $kind {
            fn rows(&self) -> usize {
                self.0.rows
            }

            fn columns(&self) -> usize {
                self.0.columns
            }

            fn get(&self, row: usize, column: usize) -> anyhow::Result<BigDecimal> {
                self.0.get(row, column)
            }

            fn default_value(&self) -> BigDecimal {
                self.0.default_value.clone()
            }

            fn entries(&self) -> Box<dyn Iterator<Item = (usize, usize, &BigDecimal)> + '_> {
                self.0.entries()
            }
        }
    };
}

sparse_matrix_kind!(SparseMatrix);
sparse_matrix_kind!(SparseMutableMatrix);

impl SparseMatrix {
    pub fn to_mutable(&self) -> SparseMutableMatrix {
        SparseMutableMatrix(self.0.clone())
    }
}

impl From<SparseMutableMatrix> for SparseMatrix {
    fn from(matrix: SparseMutableMatrix) -> Self {
        SparseMatrix(matrix.0)
    }
}

impl MutableMatrix for SparseMutableMatrix {
    fn set(&mut self, row: usize, column: usize, value: BigDecimal) -> anyhow::Result<()> {
        self.0.set(row, column, value)
    }

    fn fill(&mut self, value: BigDecimal) {
        self.0.fill(value);
    }
}
