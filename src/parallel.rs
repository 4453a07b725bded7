//! Row-partitioned data-parallel execution.
//!
//! Every pixel-touching stage splits its work by rows. Two shapes are
//! supported:
//!
//! - [`ParallelExecutor::rows`] hands each row of a freshly allocated output
//!   to exactly one task, so writes are disjoint without locking;
//! - [`ParallelExecutor::map_reduce`] splits `[0, rows)` into contiguous
//!   partitions, folds each into a private accumulator and then combines the
//!   accumulators into one result.
//!
//! Both calls block until every row has been processed. The first error
//! returned by a row aborts the call. With the `rayon` feature disabled, or
//! for an executor built with [`ParallelExecutor::sequential`], rows run in
//! order on the calling thread.

use crate::trace::trace_event;
use crate::util::{FeatScanError, FeatScanResult};
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Handle to the worker pool used by the pipelines.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Clone, Debug, Default)]
pub struct ParallelExecutor {
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
    sequential: bool,
}

impl ParallelExecutor {
    /// Uses the global rayon pool (or runs sequentially without `rayon`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every row on the calling thread.
    pub fn sequential() -> Self {
        Self {
            sequential: true,
            ..Self::default()
        }
    }

    /// Builds a dedicated pool with `threads` workers; `0` selects the
    /// global pool.
    #[cfg(feature = "rayon")]
    pub fn with_threads(threads: usize) -> FeatScanResult<Self> {
        if threads == 0 {
            return Ok(Self::new());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("featscan-{idx}"))
            .build()
            .map_err(|err| FeatScanError::ThreadPool {
                reason: err.to_string(),
            })?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
            sequential: false,
        })
    }

    /// Without `rayon` every executor is sequential.
    #[cfg(not(feature = "rayon"))]
    pub fn with_threads(_threads: usize) -> FeatScanResult<Self> {
        Ok(Self::sequential())
    }

    /// Number of workers rows are spread across.
    pub fn num_threads(&self) -> usize {
        if self.sequential {
            return 1;
        }
        #[cfg(feature = "rayon")]
        {
            match &self.pool {
                Some(pool) => pool.current_num_threads(),
                None => rayon::current_num_threads(),
            }
        }
        #[cfg(not(feature = "rayon"))]
        {
            1
        }
    }

    /// Runs `body(y, row)` for every `row_len`-sized row of `out`.
    ///
    /// Each row is visited by exactly one task. Rows may complete in any
    /// order.
    pub fn rows<T, F>(&self, out: &mut [T], row_len: usize, body: F) -> FeatScanResult<()>
    where
        T: Send,
        F: Fn(usize, &mut [T]) -> FeatScanResult<()> + Sync,
    {
        if row_len == 0 || out.len() % row_len != 0 {
            return Err(FeatScanError::InvalidInput(
                "output length must be a whole number of rows",
            ));
        }

        #[cfg(feature = "rayon")]
        {
            if !self.sequential {
                return self.install(|| {
                    out.par_chunks_mut(row_len)
                        .enumerate()
                        .try_for_each(|(y, row)| body(y, row))
                });
            }
        }

        out.chunks_mut(row_len)
            .enumerate()
            .try_for_each(|(y, row)| body(y, row))
    }

    /// Folds rows `[0, rows)` partition by partition and combines the
    /// partial accumulators.
    ///
    /// `init` creates one accumulator per partition, `body` mutates it for
    /// each row of the partition, and `reduce` folds each finished
    /// accumulator into `result`. `reduce` is never called concurrently;
    /// callers must not depend on the order partitions are combined in.
    pub fn map_reduce<A, R, Init, Body, Reduce>(
        &self,
        rows: usize,
        init: Init,
        body: Body,
        mut result: R,
        mut reduce: Reduce,
    ) -> FeatScanResult<R>
    where
        A: Send,
        Init: Fn() -> A + Sync,
        Body: Fn(usize, &mut A) -> FeatScanResult<()> + Sync,
        Reduce: FnMut(&mut R, A),
    {
        if rows == 0 {
            return Ok(result);
        }

        let run_partition = |range: Range<usize>| -> FeatScanResult<A> {
            let mut acc = init();
            for y in range {
                body(y, &mut acc)?;
            }
            Ok(acc)
        };

        let partitions = partition_rows(rows, self.num_threads());
        trace_event!(debug: "map_reduce", rows = rows, partitions = partitions.len());

        #[cfg(feature = "rayon")]
        {
            if !self.sequential && partitions.len() > 1 {
                let partials: Vec<FeatScanResult<A>> =
                    self.install(|| partitions.into_par_iter().map(&run_partition).collect());
                for partial in partials {
                    reduce(&mut result, partial?);
                }
                return Ok(result);
            }
        }

        for range in partitions {
            let acc = run_partition(range)?;
            reduce(&mut result, acc);
        }
        Ok(result)
    }

    #[cfg(feature = "rayon")]
    fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

/// Splits `[0, rows)` into at most `parts` contiguous, non-empty ranges.
fn partition_rows(rows: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.clamp(1, rows.max(1));
    let chunk = rows.div_ceil(parts);
    (0..rows)
        .step_by(chunk.max(1))
        .map(|start| start..(start + chunk).min(rows))
        .collect()
}
