//! Adaptive execution dispatcher
//!
//! Picks sequential or parallel execution per batch from its size and the
//! available cores.

use crate::{
    config::EngineConfig,
    error::Result,
    executor::{auto_select, ExecutionMode, Executor, SequentialExecutor},
};

#[cfg(feature = "parallel")]
use crate::executor::ParallelExecutor;

/// Adaptive execution dispatcher
#[derive(Debug, Clone)]
pub struct AdaptiveDispatcher {
    sequential_executor: SequentialExecutor,
    #[cfg(feature = "parallel")]
    parallel_executor: ParallelExecutor,
    config: EngineConfig,
}

impl AdaptiveDispatcher {
    /// Create a new adaptive dispatcher with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            sequential_executor: SequentialExecutor,
            #[cfg(feature = "parallel")]
            parallel_executor: ParallelExecutor::new(config.threads),
            config,
        }
    }

    /// Mode that a batch of `num_sentences` will run in
    pub fn select_mode(&self, num_sentences: usize) -> ExecutionMode {
        match self.config.execution_mode {
            ExecutionMode::Adaptive => {
                if self.config.threads == Some(1) {
                    ExecutionMode::Sequential
                } else {
                    auto_select(num_sentences, self.config.parallel_threshold)
                }
            }
            mode => mode,
        }
    }

    /// Run `task` over `items` in the configured mode
    ///
    /// Returns the results and the mode that was actually used.
    pub fn dispatch<I, T, F>(&self, items: &[I], task: F) -> Result<(Vec<T>, ExecutionMode)>
    where
        I: Sync,
        T: Send,
        F: Fn(usize, &I) -> Result<T> + Send + Sync,
    {
        let mode = self.select_mode(items.len());
        log::debug!("dispatching {} sentences in {mode} mode", items.len());
        let results = match mode {
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => self.parallel_executor.execute(items, task)?,
            _ => self.sequential_executor.execute(items, task)?,
        };
        #[cfg(not(feature = "parallel"))]
        let mode = ExecutionMode::Sequential;
        Ok((results, mode))
    }

    /// Configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_modes_are_respected() {
        let dispatcher = AdaptiveDispatcher::new(EngineConfig::sequential());
        assert_eq!(dispatcher.select_mode(10_000), ExecutionMode::Sequential);

        let config = EngineConfig {
            execution_mode: ExecutionMode::Parallel,
            ..EngineConfig::default()
        };
        let dispatcher = AdaptiveDispatcher::new(config);
        assert_eq!(dispatcher.select_mode(1), ExecutionMode::Parallel);
    }

    #[test]
    fn test_single_thread_adaptive_is_sequential() {
        let config = EngineConfig {
            threads: Some(1),
            parallel_threshold: 0,
            ..EngineConfig::default()
        };
        let dispatcher = AdaptiveDispatcher::new(config);
        assert_eq!(dispatcher.select_mode(1_000), ExecutionMode::Sequential);
    }

    #[test]
    fn test_dispatch_returns_ordered_results() {
        let dispatcher = AdaptiveDispatcher::new(EngineConfig::default());
        let (out, _mode) = dispatcher.dispatch(&[1, 2, 3], |_, &x| Ok(x * x)).unwrap();
        assert_eq!(out, vec![1, 4, 9]);
    }
}
