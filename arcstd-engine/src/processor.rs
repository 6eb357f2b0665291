//! Batch processor and builder
//!
//! [`OracleProcessor`] owns one shared [`ArcStandard`] instance and runs
//! oracle derivations, training episodes or greedy parses over batches of
//! gold trees through the adaptive dispatcher.

use std::{sync::Arc, time::Instant};

use arcstd_core::{Action, ArcStandard, AttachmentScore, GoldTree, TransitionSystem};

use crate::{
    adaptive_dispatcher::AdaptiveDispatcher,
    config::{EngineConfig, EngineConfigBuilder, ExplorationPolicy, NonProjectivePolicy, OracleMode},
    error::{EngineError, Result},
    executor::ExecutionMode,
    metrics::{BatchMetrics, BatchOutput},
    parser::{ParseOutput, Parser},
    scorer::Scorer,
    trainer::{Episode, Trainer},
};

/// Static-oracle derivation of one gold tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    /// Position of the sentence in its batch
    pub index: usize,
    /// Number of real units
    pub num_words: usize,
    /// Oracle action sequence
    pub actions: Vec<Action>,
    /// Whether the gold tree is projective
    pub projective: bool,
    /// Whether replaying the actions rebuilds the gold tree exactly
    pub reproduces: bool,
}

/// Batch driver around a shared transition system
#[derive(Debug, Clone)]
pub struct OracleProcessor {
    system: Arc<ArcStandard>,
    dispatcher: AdaptiveDispatcher,
}

impl OracleProcessor {
    /// Create a processor with the default configuration
    pub fn new(system: ArcStandard) -> Self {
        Self {
            system: Arc::new(system),
            dispatcher: AdaptiveDispatcher::new(EngineConfig::default()),
        }
    }

    /// Create a processor with a custom configuration
    pub fn with_config(system: ArcStandard, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            system: Arc::new(system),
            dispatcher: AdaptiveDispatcher::new(config),
        })
    }

    /// The shared transition system
    pub fn system(&self) -> &ArcStandard {
        &self.system
    }

    /// Configuration in use
    pub fn config(&self) -> &EngineConfig {
        self.dispatcher.config()
    }

    /// Derive the static-oracle sequence of every tree and check it
    pub fn derive(&self, trees: &[GoldTree]) -> Result<BatchOutput<Derivation>> {
        let system = &*self.system;
        self.run(trees, |index, tree| {
            let actions = system.oracle_actions(tree.heads(), tree.deprels());
            let mut state = system.initial_state(tree.len());
            for &action in &actions {
                system.perform_action(&mut state, action);
            }
            let reproduces = state.heads() == tree.heads() && state.deprels() == tree.deprels();
            let score = state.read_out().score_against(tree);
            let num_actions = actions.len();
            let derivation = Derivation {
                index,
                num_words: tree.num_words(),
                actions,
                projective: tree.is_projective(),
                reproduces,
            };
            Ok((derivation, num_actions, score))
        })
    }

    /// Generate one training episode per tree
    pub fn train(&self, trees: &[GoldTree], scorer: &dyn Scorer) -> Result<BatchOutput<Episode>> {
        let config = self.config();
        let trainer = Trainer::new(&self.system, config.oracle_mode, config.exploration);
        self.run(trees, |_, tree| {
            let episode = trainer.episode(tree, scorer)?;
            let num_actions = episode.steps.len();
            let score = episode.score;
            Ok((episode, num_actions, score))
        })
    }

    /// Parse every sentence greedily and score it against its gold tree
    pub fn parse(&self, trees: &[GoldTree], scorer: &dyn Scorer) -> Result<BatchOutput<ParseOutput>> {
        let parser = Parser::new(&*self.system);
        self.run(trees, |_, tree| {
            let output = parser.parse(tree.len(), scorer)?;
            let num_actions = output.actions.len();
            let score = output.tree.score_against(tree);
            Ok((output, num_actions, score))
        })
    }

    fn run<T, F>(&self, trees: &[GoldTree], task: F) -> Result<BatchOutput<T>>
    where
        T: Send,
        F: Fn(usize, &GoldTree) -> Result<(T, usize, AttachmentScore)> + Send + Sync,
    {
        let start = Instant::now();
        let policy = self.config().nonprojective;

        let (outcomes, mode_used) = self.dispatcher.dispatch(trees, |index, tree| {
            if !admit(policy, index, tree)? {
                return Ok(None);
            }
            task(index, tree).map(Some)
        })?;

        let mut items = Vec::with_capacity(outcomes.len());
        let mut skipped = 0;
        let mut actions = 0;
        let mut score = AttachmentScore::default();
        for outcome in outcomes {
            match outcome {
                Some((item, num_actions, sentence_score)) => {
                    items.push(item);
                    actions += num_actions;
                    score += sentence_score;
                }
                None => skipped += 1,
            }
        }

        let metrics = BatchMetrics::new(
            mode_used,
            items.len(),
            skipped,
            actions,
            start.elapsed(),
            score,
        );
        log::info!(
            "processed {} sentences ({} skipped) in {:.3}s, {} mode",
            metrics.sentences,
            metrics.skipped,
            metrics.processing_time.as_secs_f64(),
            metrics.mode_used
        );
        Ok(BatchOutput { items, metrics })
    }
}

fn admit(policy: NonProjectivePolicy, index: usize, tree: &GoldTree) -> Result<bool> {
    if tree.is_projective() {
        return Ok(true);
    }
    match policy {
        NonProjectivePolicy::Keep => Ok(true),
        NonProjectivePolicy::Skip => {
            log::warn!("skipping non-projective sentence {index}");
            Ok(false)
        }
        NonProjectivePolicy::Reject => Err(EngineError::NonProjective { index }),
    }
}

/// Builder for [`OracleProcessor`]
#[derive(Debug)]
pub struct OracleProcessorBuilder {
    system: ArcStandard,
    config_builder: EngineConfigBuilder,
}

impl OracleProcessorBuilder {
    /// Start from a label vocabulary size
    pub fn new(num_labels: usize) -> Self {
        Self::from_system(ArcStandard::new(num_labels))
    }

    /// Start from named labels
    pub fn with_labels<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_system(ArcStandard::with_labels(names))
    }

    /// Start from an existing system
    pub fn from_system(system: ArcStandard) -> Self {
        Self {
            system,
            config_builder: EngineConfigBuilder::new(),
        }
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config_builder = self.config_builder.execution_mode(mode);
        self
    }

    /// Set the thread count
    pub fn threads(mut self, count: Option<usize>) -> Self {
        self.config_builder = self.config_builder.threads(count);
        self
    }

    /// Set the parallel threshold in sentences
    pub fn parallel_threshold(mut self, sentences: usize) -> Self {
        self.config_builder = self.config_builder.parallel_threshold(sentences);
        self
    }

    /// Set the oracle mode for training
    pub fn oracle_mode(mut self, mode: OracleMode) -> Self {
        self.config_builder = self.config_builder.oracle_mode(mode);
        self
    }

    /// Set the exploration policy for training
    pub fn exploration(mut self, policy: ExplorationPolicy) -> Self {
        self.config_builder = self.config_builder.exploration(policy);
        self
    }

    /// Set the non-projective policy
    pub fn nonprojective(mut self, policy: NonProjectivePolicy) -> Self {
        self.config_builder = self.config_builder.nonprojective(policy);
        self
    }

    /// Build the processor
    pub fn build(self) -> Result<OracleProcessor> {
        let config = self.config_builder.build()?;
        OracleProcessor::with_config(self.system, config)
    }
}
