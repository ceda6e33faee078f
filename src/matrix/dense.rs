use bigdecimal::BigDecimal;
use num_traits::Zero;

use super::{Matrix, MatrixFactory, MutableMatrix};
use crate::utils::{cell_count, check_bounds};
use crate::AlgebraError;

/// Row-major storage holding every cell explicitly.
#[derive(Debug, Clone)]
struct DenseStore {
    rows: usize,
    columns: usize,
    values: Vec<BigDecimal>,
}

impl DenseStore {
    fn filled(rows: usize, columns: usize, value: BigDecimal) -> anyhow::Result<Self> {
        let cells = cell_count(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            values: vec![value; cells],
        })
    }

    fn from_values(rows: usize, columns: usize, values: Vec<BigDecimal>) -> anyhow::Result<Self> {
        let cells = cell_count(rows, columns)?;
        if values.is_empty() {
            return Self::filled(rows, columns, BigDecimal::zero());
        }
        if values.len() != cells {
            return Err(AlgebraError::invalid_argument(format!(
                "{} values given for a {}x{} matrix",
                values.len(),
                rows,
                columns
            ))
            .into());
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    fn get(&self, row: usize, column: usize) -> anyhow::Result<BigDecimal> {
        check_bounds(self.rows, self.columns, row, column)?;
        Ok(self.values[row * self.columns + column].clone())
    }
}

/// Immutable dense matrix.
#[derive(Debug, Clone)]
pub struct DenseMatrix(DenseStore);

/// Dense matrix with in-place `set` and `fill`.
#[derive(Debug, Clone)]
pub struct DenseMutableMatrix(DenseStore);

macro_rules! dense_matrix_kind {
    ($kind:ident) => {
        impl $kind {
            /// Builds a matrix from row-major `values`; an empty vector gives all zeros.
            pub fn new(rows: usize, columns: usize, values: Vec<BigDecimal>) -> anyhow::Result<Self> {
                DenseStore::from_values(rows, columns, values).map($kind)
            }

            pub fn from_fn<F>(rows: usize, columns: usize, mut value_fn: F) -> anyhow::Result<Self>
            where
                F: FnMut(usize, usize) -> BigDecimal,
            {
                cell_count(rows, columns)?;
                let values = (0..rows)
                    .flat_map(|row| (0..columns).map(move |column| (row, column)))
                    .map(|(row, column)| value_fn(row, column))
                    .collect();
                DenseStore::from_values(rows, columns, values).map($kind)
            }

            pub fn zeros(rows: usize, columns: usize) -> anyhow::Result<Self> {
                DenseStore::filled(rows, columns, BigDecimal::zero()).map($kind)
            }

            /// Copies any matrix cell by cell into dense storage.
            pub fn from_matrix<M: Matrix>(matrix: &M) -> anyhow::Result<Self> {
                let mut store = DenseStore::filled(matrix.rows(), matrix.columns(), matrix.default_value())?;
                for (row, column, value) in matrix.entries() {
                    store.values[row * store.columns + column] = value.clone();
                }
                Ok($kind(store))
            }
        }

        impl MatrixFactory for $kind {
            fn clone_empty(
                &self,
                rows: usize,
                columns: usize,
                default_value: BigDecimal,
            ) -> anyhow::Result<Self> {
                DenseStore::filled(rows, columns, default_value).map($kind)
            }

            fn put(&mut self, row: usize, column: usize, value: BigDecimal) {
                let columns = self.0.columns;
                self.0.values[row * columns + column] = value;
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
                BigDecimal::zero()
            }

            fn entries(&self) -> Box<dyn Iterator<Item = (usize, usize, &BigDecimal)> + '_> {
                let columns = self.0.columns;
                Box::new(
                    self.0
                        .values
                        .iter()
                        .enumerate()
                        .map(move |(index, value)| (index / columns, index % columns, value)),
                )
            }
        }
    };
}

dense_matrix_kind!(DenseMatrix);
dense_matrix_kind!(DenseMutableMatrix);

impl DenseMatrix {
    pub fn to_mutable(&self) -> DenseMutableMatrix {
        DenseMutableMatrix(self.0.clone())
    }
}

impl From<DenseMutableMatrix> for DenseMatrix {
    fn from(matrix: DenseMutableMatrix) -> Self {
        DenseMatrix(matrix.0)
    }
}

impl MutableMatrix for DenseMutableMatrix {
    fn set(&mut self, row: usize, column: usize, value: BigDecimal) -> anyhow::Result<()> {
        check_bounds(self.0.rows, self.0.columns, row, column)?;
        self.put(row, column, value);
        Ok(())
    }

    fn fill(&mut self, value: BigDecimal) {
        self.0.values.fill(value);
    }
}
