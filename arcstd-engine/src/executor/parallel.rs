//! Parallel execution strategy

use rayon::prelude::*;

use crate::{
    error::{EngineError, Result},
    executor::{ExecutionMode, Executor},
};

/// Parallel multi-threaded executor
///
/// With no thread count the global rayon pool is used; otherwise a
/// dedicated pool of that size is built for each batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelExecutor {
    threads: Option<usize>,
}

impl ParallelExecutor {
    /// Create a new parallel executor
    pub fn new(threads: Option<usize>) -> Self {
        Self { threads }
    }

    fn run<I, T, F>(items: &[I], task: &F) -> Result<Vec<T>>
    where
        I: Sync,
        T: Send,
        F: Fn(usize, &I) -> Result<T> + Send + Sync,
    {
        items
            .par_iter()
            .enumerate()
            .map(|(index, item)| task(index, item))
            .collect()
    }
}

impl Executor for ParallelExecutor {
    fn execute<I, T, F>(&self, items: &[I], task: F) -> Result<Vec<T>>
    where
        I: Sync,
        T: Send,
        F: Fn(usize, &I) -> Result<T> + Send + Sync,
    {
        match self.threads {
            None => Self::run(items, &task),
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
                pool.install(|| Self::run(items, &task))
            }
        }
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Parallel
    }
}
