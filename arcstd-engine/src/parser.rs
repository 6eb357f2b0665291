//! Greedy decoding loop

use arcstd_core::{Action, ParseTree, TransitionSystem};

use crate::{
    error::{EngineError, Result},
    scorer::{best_index, Scorer},
};

/// Result of parsing one sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
    /// Arcs read out of the terminal state
    pub tree: ParseTree,
    /// Actions taken, in order
    pub actions: Vec<Action>,
}

/// Greedy parser over any transition system
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a, T: TransitionSystem> {
    system: &'a T,
}

impl<'a, T: TransitionSystem> Parser<'a, T> {
    /// Wrap a transition system
    pub fn new(system: &'a T) -> Self {
        Self { system }
    }

    /// Parse a sentence of `num_units` units (ROOT included)
    ///
    /// At every step the scorer ranks the valid actions and the best one is
    /// executed, until the state is terminal.
    pub fn parse(&self, num_units: usize, scorer: &dyn Scorer) -> Result<ParseOutput> {
        let mut state = self.system.initial_state(num_units.max(1));
        while !state.is_terminal() {
            let candidates = self.system.valid_actions(&state);
            if candidates.is_empty() {
                return Err(EngineError::NoValidAction {
                    step: state.history().len(),
                });
            }
            let scores = scorer.score(&state, &candidates);
            if scores.len() != candidates.len() {
                return Err(EngineError::ScorerMismatch {
                    expected: candidates.len(),
                    got: scores.len(),
                });
            }
            let chosen = best_index(&scores).map_or(candidates[0], |i| candidates[i]);
            log::trace!(
                "step {}: {}",
                state.history().len(),
                self.system.action_name(chosen)
            );
            self.system.perform_action(&mut state, chosen);
        }

        Ok(ParseOutput {
            tree: state.read_out(),
            actions: state.history().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::{FirstValidScorer, OracleScorer};
    use arcstd_core::{ArcStandard, GoldTree, State, NO_HEAD, NO_LABEL};

    struct Silent;

    impl Scorer for Silent {
        fn score(&self, _state: &State, _candidates: &[Action]) -> Vec<f32> {
            Vec::new()
        }
    }

    #[test]
    fn test_first_valid_attaches_everything_to_last_unit() {
        let system = ArcStandard::new(1);
        let output = Parser::new(&system).parse(4, &FirstValidScorer).unwrap();
        // shift while possible, then LEFT-ARC until only ROOT is below
        assert_eq!(output.actions.len(), 6);
        assert_eq!(output.tree.heads(), &[NO_HEAD, 3, 3, 0]);
        assert!(output.tree.is_complete());
    }

    #[test]
    fn test_oracle_scorer_reproduces_gold() {
        let system = ArcStandard::new(3);
        let gold = GoldTree::new(vec![NO_HEAD, 2, 0, 2], vec![NO_LABEL, 1, 0, 2], 3).unwrap();
        let scorer = OracleScorer::new(&system, &gold);
        let output = Parser::new(&system).parse(gold.len(), &scorer).unwrap();
        assert_eq!(output.tree.heads(), gold.heads());
        assert_eq!(output.tree.deprels(), gold.deprels());
    }

    #[test]
    fn test_scorer_mismatch_is_reported() {
        let system = ArcStandard::new(1);
        let err = Parser::new(&system).parse(3, &Silent).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ScorerMismatch {
                expected: 1,
                got: 0
            }
        ));
    }

    #[test]
    fn test_root_only_sentence_parses_to_nothing() {
        let system = ArcStandard::new(1);
        let output = Parser::new(&system).parse(1, &FirstValidScorer).unwrap();
        assert!(output.actions.is_empty());
        assert!(output.tree.is_complete());
    }
}
