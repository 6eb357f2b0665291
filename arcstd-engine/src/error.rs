//! Engine error types
//!
//! Wraps core validation failures and adds the failures that only show up
//! when driving the transition system over whole batches.

use arcstd_core::CoreError;
use thiserror::Error;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core validation error
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A sentence in a batch failed validation
    #[error("sentence {index}: {source}")]
    InvalidSentence {
        /// Position of the sentence in its batch
        index: usize,
        /// The underlying validation failure
        #[source]
        source: CoreError,
    },

    /// A non-projective sentence met the `Reject` policy
    #[error("sentence {index} is non-projective")]
    NonProjective {
        /// Position of the sentence in its batch
        index: usize,
    },

    /// A non-terminal state offered no valid action
    #[error("no valid action at step {step}")]
    NoValidAction {
        /// Number of actions already taken
        step: usize,
    },

    /// A scorer returned the wrong number of scores
    #[error("scorer returned {got} scores for {expected} candidates")]
    ScorerMismatch {
        /// Number of candidate actions
        expected: usize,
        /// Number of scores returned
        got: usize,
    },

    /// Thread pool construction failed
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sentence_display() {
        let err = EngineError::InvalidSentence {
            index: 3,
            source: CoreError::SelfLoop { unit: 2 },
        };
        assert_eq!(err.to_string(), "sentence 3: unit 2 is its own head");
    }

    #[test]
    fn test_core_error_converts() {
        let err: EngineError = CoreError::Empty.into();
        assert!(matches!(err, EngineError::Core(CoreError::Empty)));
    }
}
