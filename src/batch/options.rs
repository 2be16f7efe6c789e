//! Worker-pool configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{DictError, Result};

/// Default number of words handed to a worker per task.
pub const DEFAULT_CHUNKSIZE: usize = 10_000;

/// How a batch operation spreads its words over worker threads.
///
/// - `n_jobs`: number of worker threads.
/// - `chunksize`: number of words dispatched to a worker at once.
/// - `maxtasksperchild`: when set, the pool is torn down and rebuilt after
///   every worker has had the chance to run this many chunks, releasing
///   per-thread allocations on very large dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiprocessingOptions {
    /// Number of worker threads (must be positive)
    pub n_jobs: usize,
    /// Words per dispatched task (must be positive)
    pub chunksize: usize,
    /// Chunks per worker before the pool is recycled (must be positive if set)
    pub maxtasksperchild: Option<usize>,
}

impl Default for MultiprocessingOptions {
    fn default() -> Self {
        Self {
            n_jobs: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            chunksize: DEFAULT_CHUNKSIZE,
            maxtasksperchild: None,
        }
    }
}

impl MultiprocessingOptions {
    /// Create validated options.
    pub fn new(n_jobs: usize, chunksize: usize, maxtasksperchild: Option<usize>) -> Result<Self> {
        let options = Self {
            n_jobs,
            chunksize,
            maxtasksperchild,
        };
        options.validate()?;
        Ok(options)
    }

    /// One worker, default chunk size.
    pub fn single_threaded() -> Self {
        Self {
            n_jobs: 1,
            ..Self::default()
        }
    }

    /// Reject non-positive values.
    pub fn validate(&self) -> Result<()> {
        if self.n_jobs == 0 {
            return Err(DictError::invalid(
                "mp_options",
                "Property 'n_jobs' is invalid!",
            ));
        }
        if self.chunksize == 0 {
            return Err(DictError::invalid(
                "mp_options",
                "Property 'chunksize' is invalid!",
            ));
        }
        if self.maxtasksperchild == Some(0) {
            return Err(DictError::invalid(
                "mp_options",
                "Property 'maxtasksperchild' is invalid!",
            ));
        }
        Ok(())
    }

    /// Number of words processed by one pool before it is rebuilt, if any.
    pub(crate) fn generation_len(&self) -> Option<usize> {
        self.maxtasksperchild.map(|tasks| {
            tasks
                .saturating_mul(self.chunksize)
                .saturating_mul(self.n_jobs)
        })
    }
}
