use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The buffer does not hold a whole number of rows of the given stride.
    #[error("buffer of length {0} does not match {1} rows of stride {2}")]
    SizeMismatch(usize, usize, usize),
}

/// Controls how many workers run a row-parallel operation and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool, one worker per pool thread.
    #[default]
    Global,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads, one worker per thread.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Map an optional worker count, e.g. from the command line, to a strategy.
    ///
    /// `None` uses the global pool and a single worker runs serially.
    pub fn from_num_workers(num_workers: Option<usize>) -> Self {
        match num_workers {
            None => ExecutionStrategy::Global,
            Some(1) => ExecutionStrategy::Serial,
            Some(n) => ExecutionStrategy::Fixed(n),
        }
    }

    /// Number of row ranges the work is split into.
    pub fn num_workers(&self) -> usize {
        match self {
            ExecutionStrategy::Global => rayon::current_num_threads(),
            ExecutionStrategy::Serial => 1,
            ExecutionStrategy::Fixed(n) => *n,
        }
    }
}

/// A half-open range of image rows `[start, end)` assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// First row of the range.
    pub start: usize,
    /// One past the last row of the range.
    pub end: usize,
}

impl RowRange {
    /// Number of rows in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range holds no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over the rows of the range.
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Split `height` rows into `num_workers` contiguous ranges.
///
/// The first `height % num_workers` ranges get one extra row. When there are more
/// workers than rows the trailing ranges are empty.
///
/// # Example
///
/// ```
/// use rasterconv_imgproc::parallel::{partition_rows, RowRange};
///
/// let ranges = partition_rows(10, 4).unwrap();
///
/// assert_eq!(
///     ranges,
///     vec![
///         RowRange { start: 0, end: 3 },
///         RowRange { start: 3, end: 6 },
///         RowRange { start: 6, end: 8 },
///         RowRange { start: 8, end: 10 },
///     ]
/// );
/// ```
pub fn partition_rows(height: usize, num_workers: usize) -> Result<Vec<RowRange>, ParallelError> {
    if num_workers == 0 {
        return Err(ParallelError::InvalidThreadCount(num_workers));
    }

    let base = height / num_workers;
    let rem = height % num_workers;

    let mut start = 0;
    let ranges = (0..num_workers)
        .map(|i| {
            let len = if i < rem { base + 1 } else { base };
            let range = RowRange {
                start,
                end: start + len,
            };
            start = range.end;
            range
        })
        .collect();

    Ok(ranges)
}

/// Run `f` over disjoint row ranges of `dst` and wait for all of them to finish.
///
/// `dst` is split into one mutable chunk per non-empty range of
/// [`partition_rows`], so every worker only sees the rows it owns. The call
/// returns once every spawned worker has completed.
///
/// # Arguments
///
/// * `dst` - The destination buffer, `height` rows of `row_stride` samples.
/// * `row_stride` - Number of samples per row.
/// * `height` - Number of rows.
/// * `strategy` - The execution strategy.
/// * `f` - The work for one range, given the range and its rows of `dst`.
pub fn par_for_each_row_range<T, F>(
    dst: &mut [T],
    row_stride: usize,
    height: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(RowRange, &mut [T]) + Sync,
{
    if row_stride.checked_mul(height) != Some(dst.len()) {
        return Err(ParallelError::SizeMismatch(dst.len(), height, row_stride));
    }

    let ranges = partition_rows(height, strategy.num_workers())?;

    let mut rest = dst;
    let mut chunks = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * row_stride);
        rest = tail;
        if !range.is_empty() {
            chunks.push((range, head));
        }
    }

    let f = &f;
    match strategy {
        ExecutionStrategy::Serial => {
            chunks
                .into_iter()
                .for_each(|(range, chunk)| f(range, chunk));
        }
        ExecutionStrategy::Global => {
            rayon::scope(|s| {
                for (range, chunk) in chunks {
                    s.spawn(move |_| f(range, chunk));
                }
            });
        }
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.scope(|s| {
                for (range, chunk) in chunks {
                    s.spawn(move |_| f(range, chunk));
                }
            });
        }
    }

    Ok(())
}
