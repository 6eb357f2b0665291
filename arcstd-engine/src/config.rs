//! Configuration types for the engine

use crate::{
    error::{EngineError, Result},
    ExecutionMode,
};

/// Which oracle supervises training episodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleMode {
    /// Follow the static oracle; every step is gold
    #[default]
    Static,
    /// Cost every candidate and allow the scorer to lead the trajectory
    Dynamic,
}

/// When a dynamic-oracle episode follows the scorer instead of the oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplorationPolicy {
    /// Always take a minimal-cost action
    #[default]
    Never,
    /// Always take the scorer's best action
    Always,
    /// Take the scorer's best action on every `every`-th step
    Periodic {
        /// Period in steps; must be non-zero
        every: usize,
    },
}

impl ExplorationPolicy {
    /// Whether step `step` (0-based) follows the scorer
    pub fn explores_at(&self, step: usize) -> bool {
        match *self {
            ExplorationPolicy::Never => false,
            ExplorationPolicy::Always => true,
            ExplorationPolicy::Periodic { every } => every > 0 && (step + 1) % every == 0,
        }
    }
}

/// What to do with gold trees whose arcs cross
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonProjectivePolicy {
    /// Leave the sentence out of the batch output
    #[default]
    Skip,
    /// Process it anyway; the static oracle will not reproduce it
    Keep,
    /// Fail the whole batch
    Reject,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Execution mode selector
    pub execution_mode: ExecutionMode,
    /// Number of threads for parallel execution (None = auto)
    pub threads: Option<usize>,
    /// Minimum batch size (sentences) for parallel processing
    pub parallel_threshold: usize,
    /// Oracle used by training episodes
    pub oracle_mode: OracleMode,
    /// Exploration schedule for dynamic-oracle episodes
    pub exploration: ExplorationPolicy,
    /// Handling of non-projective gold trees
    pub nonprojective: NonProjectivePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            execution_mode: ExecutionMode::Adaptive,
            threads: None,
            parallel_threshold: 256,
            oracle_mode: OracleMode::Static,
            exploration: ExplorationPolicy::Never,
            nonprojective: NonProjectivePolicy::Skip,
        }
    }
}

impl EngineConfig {
    /// Single-threaded and reproducible
    pub fn sequential() -> Self {
        Self {
            execution_mode: ExecutionMode::Sequential,
            threads: Some(1),
            parallel_threshold: usize::MAX,
            ..Default::default()
        }
    }

    /// Parallel as early as possible
    pub fn fast() -> Self {
        Self {
            execution_mode: ExecutionMode::Adaptive,
            parallel_threshold: 32,
            ..Default::default()
        }
    }

    /// Dynamic oracle with periodic exploration
    pub fn exploring(every: usize) -> Self {
        Self {
            oracle_mode: OracleMode::Dynamic,
            exploration: ExplorationPolicy::Periodic { every },
            ..Default::default()
        }
    }

    /// Check the settings for contradictions
    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(EngineError::ConfigError(
                "thread count must be at least 1".to_string(),
            ));
        }
        if let ExplorationPolicy::Periodic { every: 0 } = self.exploration {
            return Err(EngineError::ConfigError(
                "exploration period must be at least 1".to_string(),
            ));
        }
        if self.oracle_mode == OracleMode::Static && self.exploration != ExplorationPolicy::Never
        {
            return Err(EngineError::ConfigError(
                "exploration requires the dynamic oracle".to_string(),
            ));
        }
        Ok(())
    }

    /// Thread count to use for parallel batches
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Builder for [`EngineConfig`]
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Set the thread count
    pub fn threads(mut self, count: Option<usize>) -> Self {
        self.config.threads = count;
        self
    }

    /// Set the parallel threshold in sentences
    pub fn parallel_threshold(mut self, sentences: usize) -> Self {
        self.config.parallel_threshold = sentences;
        self
    }

    /// Set the oracle mode
    pub fn oracle_mode(mut self, mode: OracleMode) -> Self {
        self.config.oracle_mode = mode;
        self
    }

    /// Set the exploration policy
    pub fn exploration(mut self, policy: ExplorationPolicy) -> Self {
        self.config.exploration = policy;
        self
    }

    /// Set the non-projective policy
    pub fn nonprojective(mut self, policy: NonProjectivePolicy) -> Self {
        self.config.nonprojective = policy;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
