use bigdecimal::BigDecimal;
use rayon::iter::plumbing::{bridge_unindexed, Folder, UnindexedConsumer, UnindexedProducer};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use super::DecimalRange;

/// Parallel iterator over a [`DecimalRange`].
///
/// Work is divided with [`DecimalRange::try_split`], so every worker produces a
/// contiguous run of the progression and ordered collection reproduces the
/// sequential output.
#[derive(Debug, Clone)]
pub struct ParDecimalRange {
    range: DecimalRange,
}

impl ParDecimalRange {
    pub fn remaining(&self) -> u64 {
        self.range.remaining()
    }
}

impl IntoParallelIterator for DecimalRange {
    type Iter = ParDecimalRange;
    type Item = BigDecimal;

    fn into_par_iter(self) -> Self::Iter {
        ParDecimalRange { range: self }
    }
}

impl ParallelIterator for ParDecimalRange {
    type Item = BigDecimal;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge_unindexed(RangeProducer(self.range), consumer)
    }
}

struct RangeProducer(DecimalRange);

impl UnindexedProducer for RangeProducer {
    type Item = BigDecimal;

    fn split(mut self) -> (Self, Option<Self>) {
        let second = self.0.try_split().map(RangeProducer);
        (self, second)
    }

    fn fold_with<F>(self, folder: F) -> F
    where
        F: Folder<Self::Item>,
    {
        folder.consume_iter(self.0)
    }
}
