//! Training episodes
//!
//! An episode walks one gold sentence and records, for every configuration
//! visited, the candidates and the supervision a learner needs. Under the
//! static oracle the walk is the gold derivation. Under the dynamic oracle
//! every candidate is costed and the walk may follow the scorer into
//! non-gold configurations, as scheduled by the [`ExplorationPolicy`].

use arcstd_core::{
    Action, ArcStandard, AttachmentScore, GoldTree, ParseTree, TransitionSystem, UnitId,
};

use crate::{
    config::{ExplorationPolicy, OracleMode},
    error::{EngineError, Result},
    scorer::{best_index, Scorer},
};

/// Supervision for one configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingStep {
    /// Stack contents before the action, bottom first
    pub stack: Vec<UnitId>,
    /// Buffer cursor before the action
    pub cursor: UnitId,
    /// Valid actions in id order
    pub candidates: Vec<Action>,
    /// Cost of each candidate; empty under the static oracle
    pub costs: Vec<u32>,
    /// Best action according to the oracle
    pub oracle: Action,
    /// Action actually executed
    pub taken: Action,
}

impl TrainingStep {
    /// Whether the executed action was the oracle's choice
    pub fn followed_oracle(&self) -> bool {
        self.oracle == self.taken
    }
}

/// All steps of one sentence
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Supervision per visited configuration
    pub steps: Vec<TrainingStep>,
    /// Tree built by the episode
    pub tree: ParseTree,
    /// Attachment score of that tree against gold
    pub score: AttachmentScore,
}

impl Episode {
    /// Number of steps that left the oracle's path
    pub fn num_explored(&self) -> usize {
        self.steps.iter().filter(|s| !s.followed_oracle()).count()
    }
}

/// Episode generator for the arc-standard system
#[derive(Debug, Clone, Copy)]
pub struct Trainer<'a> {
    system: &'a ArcStandard,
    mode: OracleMode,
    exploration: ExplorationPolicy,
}

impl<'a> Trainer<'a> {
    /// Create a trainer; `exploration` only matters under the dynamic oracle
    pub fn new(system: &'a ArcStandard, mode: OracleMode, exploration: ExplorationPolicy) -> Self {
        Self {
            system,
            mode,
            exploration,
        }
    }

    /// Oracle mode of this trainer
    pub fn mode(&self) -> OracleMode {
        self.mode
    }

    /// Walk one gold sentence
    pub fn episode(&self, gold: &GoldTree, scorer: &dyn Scorer) -> Result<Episode> {
        let heads = gold.heads();
        let deprels = gold.deprels();
        let mut state = self.system.initial_state(gold.len());
        let mut steps = Vec::with_capacity(2 * gold.num_words());

        while !state.is_terminal() {
            let candidates = self.system.valid_actions(&state);
            if candidates.is_empty() {
                return Err(EngineError::NoValidAction { step: steps.len() });
            }

            let (costs, oracle, taken) = match self.mode {
                OracleMode::Static => {
                    let oracle = self
                        .system
                        .oracle_action_onestep(heads, deprels, &state)
                        .ok_or(EngineError::NoValidAction { step: steps.len() })?;
                    (Vec::new(), oracle, oracle)
                }
                OracleMode::Dynamic => {
                    let costs = self
                        .system
                        .transition_costs(&state, &candidates, heads, deprels);
                    let scores = scorer.score(&state, &candidates);
                    if scores.len() != candidates.len() {
                        return Err(EngineError::ScorerMismatch {
                            expected: candidates.len(),
                            got: scores.len(),
                        });
                    }
                    let predicted = best_index(&scores).map_or(candidates[0], |i| candidates[i]);
                    let oracle = best_zero_cost(&candidates, &costs, &scores);
                    let taken = if self.exploration.explores_at(steps.len()) {
                        predicted
                    } else {
                        oracle
                    };
                    (costs, oracle, taken)
                }
            };

            steps.push(TrainingStep {
                stack: state.stack().to_vec(),
                cursor: state.cursor(),
                candidates,
                costs,
                oracle,
                taken,
            });
            self.system.perform_action(&mut state, taken);
        }

        let tree = state.read_out();
        let score = tree.score_against(gold);
        log::debug!(
            "episode over {} words: {} steps, {}/{} heads correct",
            gold.num_words(),
            steps.len(),
            score.unlabeled,
            score.total
        );
        Ok(Episode { steps, tree, score })
    }
}

/// The scorer's favourite among the minimal-cost candidates
fn best_zero_cost(candidates: &[Action], costs: &[u32], scores: &[f32]) -> Action {
    let min = costs.iter().copied().min().unwrap_or(0);
    let cheapest: Vec<usize> = (0..candidates.len()).filter(|&i| costs[i] == min).collect();
    let cheapest_scores: Vec<f32> = cheapest.iter().map(|&i| scores[i]).collect();
    let pick = best_index(&cheapest_scores).unwrap_or(0);
    candidates[cheapest[pick]]
}
