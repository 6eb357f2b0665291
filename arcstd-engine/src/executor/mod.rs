//! Execution strategies for sentence batches
//!
//! Sentences are independent, so a batch is a plain map over its items.
//! Executors decide whether that map runs on one thread or on a pool, and
//! always return results in input order.

use crate::error::Result;

#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequential;

#[cfg(feature = "parallel")]
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Single-threaded sequential processing
    Sequential,
    /// Multi-threaded parallel processing
    Parallel,
    /// Choose per batch from its size
    Adaptive,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "sequential"),
            ExecutionMode::Parallel => write!(f, "parallel"),
            ExecutionMode::Adaptive => write!(f, "adaptive"),
        }
    }
}

/// Trait for execution strategies
pub trait Executor: Send + Sync {
    /// Run `task` on every item, returning results in input order
    ///
    /// The first error aborts the batch.
    fn execute<I, T, F>(&self, items: &[I], task: F) -> Result<Vec<T>>
    where
        I: Sync,
        T: Send,
        F: Fn(usize, &I) -> Result<T> + Send + Sync;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}

/// Select an execution mode from the batch size
pub fn auto_select(num_sentences: usize, threshold: usize) -> ExecutionMode {
    if num_sentences < 2 || num_sentences < threshold || num_cpus::get() < 2 {
        ExecutionMode::Sequential
    } else {
        #[cfg(feature = "parallel")]
        return ExecutionMode::Parallel;

        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Sequential
    }
}
