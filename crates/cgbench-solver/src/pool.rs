//! Fixed-size worker pool with fork-join parallel-for primitives.
//!
//! Every vector loop in the solver runs through a [`WorkerPool`]: the index
//! range `0..len` is cut into contiguous, disjoint blocks (one per worker),
//! each block is processed by exactly one task, and the calling thread blocks
//! until all of them have finished. Successive calls never overlap.
//!
//! # Reduction order
//!
//! [`WorkerPool::map_reduce`] combines per-block partials on the calling
//! thread in block order. For a fixed thread count the partition is fixed, so
//! reductions are bit-for-bit reproducible. Changing the thread count changes
//! the partition and therefore the floating-point summation order; results may
//! then differ in the last bits.

use std::ops::Range;

use rayon::prelude::*;
use tracing::debug;

use crate::error::SolverError;

/// A dedicated rayon pool plus the explicit block partition used by every
/// parallel region.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish()
    }
}

impl WorkerPool {
    /// Build a pool.
    ///
    /// `None` or `Some(0)` keeps rayon's default size (available parallelism,
    /// or `RAYON_NUM_THREADS` when set).
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ThreadPool`] if the OS refuses to spawn workers.
    pub fn new(threads: Option<usize>) -> Result<Self, SolverError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("cgbench-worker-{i}"));
        if let Some(n) = threads.filter(|&n| n > 0) {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;
        let threads = pool.current_num_threads();

        debug!(threads, "worker pool started");

        Ok(Self { pool, threads })
    }

    /// A pool with a single worker.
    pub fn single() -> Result<Self, SolverError> {
        Self::new(Some(1))
    }

    /// Number of workers in the pool.
    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Block partition of `0..len` used by every parallel region on this pool.
    pub fn partition(&self, len: usize) -> Vec<Range<usize>> {
        block_partition(len, self.threads)
    }

    /// Fork-join over `out`: `f(range, block)` is called once per block with
    /// the global index range and the matching mutable sub-slice.
    pub fn for_each_block<F>(&self, out: &mut [f64], f: F)
    where
        F: Fn(Range<usize>, &mut [f64]) + Sync + Send,
    {
        let ranges = self.partition(out.len());
        let blocks = split_blocks_mut(out, &ranges);

        self.pool.install(|| {
            ranges
                .into_par_iter()
                .zip(blocks)
                .for_each(|(range, block)| f(range, block));
        });
    }

    /// Fork-join over two equally long output vectors sharing one partition.
    ///
    /// # Panics
    ///
    /// Panics if `a.len() != b.len()`.
    pub fn for_each_block_pair<F>(&self, a: &mut [f64], b: &mut [f64], f: F)
    where
        F: Fn(Range<usize>, &mut [f64], &mut [f64]) + Sync + Send,
    {
        assert_eq!(a.len(), b.len(), "for_each_block_pair: length mismatch");

        let ranges = self.partition(a.len());
        let a_blocks = split_blocks_mut(a, &ranges);
        let b_blocks = split_blocks_mut(b, &ranges);

        self.pool.install(|| {
            ranges
                .into_par_iter()
                .zip(a_blocks)
                .zip(b_blocks)
                .for_each(|((range, a_block), b_block)| f(range, a_block, b_block));
        });
    }

    /// Fork-join reduction over `0..len`.
    ///
    /// `map` produces one partial per block; the partials are folded with
    /// `combine` on the calling thread, starting from `identity`, in block
    /// order.
    pub fn map_reduce<T, M, C>(&self, len: usize, identity: T, map: M, combine: C) -> T
    where
        T: Send,
        M: Fn(Range<usize>) -> T + Sync + Send,
        C: Fn(T, T) -> T,
    {
        let ranges = self.partition(len);
        let partials: Vec<T> = self
            .pool
            .install(|| ranges.into_par_iter().map(&map).collect());

        partials.into_iter().fold(identity, combine)
    }
}

/// Split `0..len` into `min(parts, len)` contiguous blocks.
///
/// The first `len % parts` blocks hold one extra index, so block sizes differ
/// by at most one. The blocks cover every index exactly once, in order.
/// Returns no blocks when `len == 0`.
pub fn block_partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.min(len);
    if parts == 0 {
        return Vec::new();
    }

    let base = len / parts;
    let extra = len % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut lo = 0;
    for p in 0..parts {
        let hi = lo + base + usize::from(p < extra);
        ranges.push(lo..hi);
        lo = hi;
    }
    ranges
}

/// Cut `data` into the mutable sub-slices named by a contiguous partition.
fn split_blocks_mut<'a>(mut data: &'a mut [f64], ranges: &[Range<usize>]) -> Vec<&'a mut [f64]> {
    let mut blocks = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = std::mem::take(&mut data).split_at_mut(range.len());
        blocks.push(head);
        data = tail;
    }
    debug_assert!(data.is_empty(), "partition does not cover the slice");
    blocks
}
