//! Action scoring seam
//!
//! The transition system only filters and executes actions; something else
//! has to rank them. A [`Scorer`] is that something: a trained model in a
//! real parser, or one of the reference scorers below.

use arcstd_core::{Action, ArcStandard, GoldTree, State, TransitionSystem};

/// Ranks the candidate actions of a state
pub trait Scorer: Send + Sync {
    /// One score per candidate, higher is better
    fn score(&self, state: &State, candidates: &[Action]) -> Vec<f32>;

    /// Human-readable name for logs
    fn name(&self) -> &'static str {
        "scorer"
    }
}

/// Prefers earlier candidates; SHIFT wins whenever it is valid
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstValidScorer;

impl Scorer for FirstValidScorer {
    fn score(&self, _state: &State, candidates: &[Action]) -> Vec<f32> {
        (0..candidates.len()).map(|i| -(i as f32)).collect()
    }

    fn name(&self) -> &'static str {
        "first-valid"
    }
}

/// Scores candidates by their negated dynamic-oracle cost against a gold tree
#[derive(Debug, Clone, Copy)]
pub struct OracleScorer<'a> {
    system: &'a ArcStandard,
    gold: &'a GoldTree,
}

impl<'a> OracleScorer<'a> {
    /// Score against `gold` under `system`
    pub fn new(system: &'a ArcStandard, gold: &'a GoldTree) -> Self {
        Self { system, gold }
    }
}

impl Scorer for OracleScorer<'_> {
    fn score(&self, state: &State, candidates: &[Action]) -> Vec<f32> {
        self.system
            .transition_costs(state, candidates, self.gold.heads(), self.gold.deprels())
            .into_iter()
            .map(|cost| -(cost as f32))
            .collect()
    }

    fn name(&self) -> &'static str {
        "oracle"
    }
}

/// Index of the highest score; ties go to the earliest candidate
pub fn best_index(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &score)| match best {
            Some((_, top)) if score.total_cmp(&top).is_le() => best,
            _ => Some((i, score)),
        })
        .map(|(i, _)| i)
}
