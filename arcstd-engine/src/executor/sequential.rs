//! Sequential execution strategy

use crate::{
    error::Result,
    executor::{ExecutionMode, Executor},
};

/// Sequential single-threaded executor
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn execute<I, T, F>(&self, items: &[I], task: F) -> Result<Vec<T>>
    where
        I: Sync,
        T: Send,
        F: Fn(usize, &I) -> Result<T> + Send + Sync,
    {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| task(index, item))
            .collect()
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }
}
