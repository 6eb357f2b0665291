//! Drivers around the arc-standard transition system
//!
//! This crate provides the parse loop, training-episode generation with
//! static and dynamic oracles, and batch execution strategies over
//! independent sentences.

#![warn(missing_docs)]

pub mod adaptive_dispatcher;
pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod parser;
pub mod processor;
pub mod scorer;
pub mod trainer;

// Re-export key types
pub use adaptive_dispatcher::AdaptiveDispatcher;
pub use config::{
    EngineConfig, EngineConfigBuilder, ExplorationPolicy, NonProjectivePolicy, OracleMode,
};
pub use error::{EngineError, Result};
pub use executor::{ExecutionMode, Executor};
pub use metrics::{BatchMetrics, BatchOutput};
pub use parser::{ParseOutput, Parser};
pub use processor::{Derivation, OracleProcessor, OracleProcessorBuilder};
pub use scorer::{FirstValidScorer, OracleScorer, Scorer};
pub use trainer::{Episode, Trainer, TrainingStep};

// Re-export from core for convenience
pub use arcstd_core::{Action, ArcStandard, GoldTree, ParseTree, TransitionSystem};
