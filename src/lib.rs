pub mod context;
pub mod error;
pub mod matrix;
pub mod range;
mod utils;

pub use context::MathContext;
pub use error::AlgebraError;
pub use matrix::{
    DenseMatrix, DenseMutableMatrix, Matrix, MutableMatrix, SparseMatrix, SparseMutableMatrix,
};
pub use range::{range, range_by_one, range_closed, range_closed_by_one, DecimalRange};

pub use bigdecimal::{BigDecimal, RoundingMode};
