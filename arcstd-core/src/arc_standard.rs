//! Arc-standard transition system
//!
//! Three moves over a stack seeded with ROOT and a left-to-right buffer:
//!
//! - SHIFT moves the buffer head onto the stack;
//! - LEFT-ARC(l) attaches `s1` under `s0` and pops `s1`;
//! - RIGHT-ARC(l) attaches `s0` under `s1` and pops `s0`.
//!
//! Every projective tree over `n` real units is derived by exactly `2n`
//! actions.

use crate::{
    dynamic_oracle::configuration_loss, Action, ActionCodec, Label, State, Structure,
    TransitionSystem, UnitId, NO_HEAD, ROOT,
};

/// The arc-standard system over a fixed label vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcStandard {
    codec: ActionCodec,
    label_names: Option<Vec<String>>,
}

impl ArcStandard {
    /// Create the system for `num_labels` dependency labels
    pub fn new(num_labels: usize) -> Self {
        Self {
            codec: ActionCodec::new(num_labels),
            label_names: None,
        }
    }

    /// Create the system from a label vocabulary; ids follow the slice order
    pub fn with_labels<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        Self {
            codec: ActionCodec::new(names.len()),
            label_names: Some(names),
        }
    }

    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    pub fn num_labels(&self) -> usize {
        self.codec.num_labels()
    }

    /// Label names, if the system was built from a vocabulary
    pub fn label_names(&self) -> Option<&[String]> {
        self.label_names.as_deref()
    }

    pub fn shift_id(&self) -> Action {
        self.codec.shift()
    }

    pub fn left_id(&self, label: Label) -> Action {
        self.codec.left(label)
    }

    pub fn right_id(&self, label: Label) -> Action {
        self.codec.right(label)
    }

    /// Label carried by an arc action, `None` for SHIFT or unknown ids
    pub fn parse_label(&self, action: Action) -> Option<Label> {
        self.codec.try_decode(action).and_then(|(_, label)| label)
    }

    pub fn is_shift(&self, action: Action) -> bool {
        matches!(self.codec.try_decode(action), Some((Structure::Shift, _)))
    }

    pub fn is_left(&self, action: Action) -> bool {
        matches!(self.codec.try_decode(action), Some((Structure::Left, _)))
    }

    pub fn is_right(&self, action: Action) -> bool {
        matches!(self.codec.try_decode(action), Some((Structure::Right, _)))
    }

    /// Name of a label id, falling back to the number itself
    pub fn label_name(&self, label: Label) -> String {
        self.label_names
            .as_ref()
            .and_then(|names| names.get(label))
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }

    /// Static-oracle decision for one configuration
    ///
    /// Pending gold dependents are recomputed from the arcs already in
    /// `state`, so the state may come from any trajectory. Returns `None`
    /// only for a terminal state.
    pub fn oracle_action_onestep(
        &self,
        heads: &[UnitId],
        deprels: &[Label],
        state: &State,
    ) -> Option<Action> {
        check_gold(heads, deprels, state.len());
        if state.is_terminal() {
            return None;
        }

        let mut pending = vec![0usize; state.len()];
        for unit in 1..state.len() {
            if !state.is_attached(unit) && heads[unit] < state.len() {
                pending[heads[unit]] += 1;
            }
        }
        Some(self.static_decision(heads, deprels, state, &pending))
    }

    /// Loss of a configuration: wrong attachments of its best completion
    pub fn cost(&self, state: &State, heads: &[UnitId], deprels: &[Label]) -> u32 {
        configuration_loss(state, heads, deprels)
    }

    /// Valid actions of minimal cost from `state`
    ///
    /// On a gold-consistent configuration of a projective tree these are
    /// exactly the zero-cost actions.
    pub fn dynamic_oracle_actions(
        &self,
        state: &State,
        heads: &[UnitId],
        deprels: &[Label],
    ) -> Vec<Action> {
        let valid = self.valid_actions(state);
        let costs = self.transition_costs(state, &valid, heads, deprels);
        let Some(&min) = costs.iter().min() else {
            return Vec::new();
        };
        valid
            .into_iter()
            .zip(costs)
            .filter_map(|(action, cost)| (cost == min).then_some(action))
            .collect()
    }

    fn static_decision(
        &self,
        heads: &[UnitId],
        deprels: &[Label],
        state: &State,
        pending: &[usize],
    ) -> Action {
        let s0 = state.s0();
        if let Some(s1) = state.s1() {
            if s1 != ROOT && heads[s1] == s0 && pending[s1] == 0 {
                return self.codec.left(deprels[s1]);
            }
            if heads[s0] == s1 && pending[s0] == 0 {
                return self.codec.right(deprels[s0]);
            }
        }
        if !state.is_buffer_empty() {
            return self.codec.shift();
        }
        // Only reachable for non-projective gold trees: keep reducing so the
        // derivation still terminates.
        self.codec.right(deprels[s0])
    }

    fn structural_cost(
        &self,
        state: &State,
        structure: Structure,
        heads: &[UnitId],
        deprels: &[Label],
        before: u32,
    ) -> u32 {
        let mut next = state.clone();
        match structure {
            Structure::Shift => next.shift(),
            Structure::Left => next.reduce_left(deprels[state.s1().unwrap_or(ROOT)]),
            Structure::Right => next.reduce_right(deprels[state.s0()]),
        }
        configuration_loss(&next, heads, deprels).saturating_sub(before)
    }
}

impl TransitionSystem for ArcStandard {
    fn name(&self) -> &'static str {
        "arc-standard"
    }

    fn action_name(&self, action: Action) -> String {
        match self.codec.try_decode(action) {
            Some((Structure::Shift, _)) => Structure::Shift.to_string(),
            Some((structure, Some(label))) => {
                format!("{structure}({})", self.label_name(label))
            }
            _ => format!("UNKNOWN{action}"),
        }
    }

    fn num_actions(&self) -> usize {
        self.codec.num_actions()
    }

    fn allow_nonprojective(&self) -> bool {
        false
    }

    fn is_valid_action(&self, state: &State, action: Action) -> bool {
        match self.codec.try_decode(action) {
            Some((Structure::Shift, _)) => !state.is_buffer_empty(),
            Some((Structure::Left, _)) => state.s1().is_some_and(|s1| s1 != ROOT),
            Some((Structure::Right, _)) => state.stack_len() >= 2,
            None => false,
        }
    }

    fn perform_action(&self, state: &mut State, action: Action) {
        assert!(
            self.is_valid_action(state, action),
            "invalid action {} with stack {:?} and buffer {:?}",
            self.action_name(action),
            state.stack(),
            state.buffer()
        );
        match self.codec.decode(action) {
            (Structure::Shift, _) => state.shift(),
            (Structure::Left, Some(label)) => state.reduce_left(label),
            (Structure::Right, Some(label)) => state.reduce_right(label),
            (structure, None) => unreachable!("{structure} without a label"),
        }
        state.record(action);
    }

    fn oracle_actions(&self, heads: &[UnitId], deprels: &[Label]) -> Vec<Action> {
        check_gold(heads, deprels, heads.len());
        let mut state = State::new(heads.len().max(1));

        let mut pending = vec![0usize; heads.len()];
        for &head in heads.iter().skip(1) {
            if head != NO_HEAD && head < heads.len() {
                pending[head] += 1;
            }
        }

        let mut actions = Vec::with_capacity(2 * heads.len().saturating_sub(1));
        while !state.is_terminal() {
            let action = self.static_decision(heads, deprels, &state, &pending);
            let child = match self.codec.structure(action) {
                Structure::Shift => None,
                Structure::Left => state.s1(),
                Structure::Right => Some(state.s0()),
            };
            if let Some(child) = child {
                let gold_head = heads[child];
                if gold_head < heads.len() {
                    pending[gold_head] -= 1;
                }
            }
            self.perform_action(&mut state, action);
            actions.push(action);
        }
        actions
    }

    /// # Panics
    /// Panics if a candidate is not valid in `state`.
    fn transition_costs(
        &self,
        state: &State,
        candidates: &[Action],
        heads: &[UnitId],
        deprels: &[Label],
    ) -> Vec<u32> {
        check_gold(heads, deprels, state.len());
        let before = configuration_loss(state, heads, deprels);

        // Candidates sharing a structure differ only in the label of the arc
        // they commit, which changes the loss by at most one.
        let mut structural: [Option<u32>; 3] = [None; 3];
        candidates
            .iter()
            .map(|&action| {
                assert!(
                    self.is_valid_action(state, action),
                    "cannot cost invalid action {} with stack {:?}",
                    self.action_name(action),
                    state.stack()
                );
                let (structure, label) = self.codec.decode(action);
                let slot = match structure {
                    Structure::Shift => 0,
                    Structure::Left => 1,
                    Structure::Right => 2,
                };
                let base = *structural[slot].get_or_insert_with(|| {
                    self.structural_cost(state, structure, heads, deprels, before)
                });
                // A wrong label only adds to an arc whose head is right
                let arc = match structure {
                    Structure::Shift => None,
                    Structure::Left => state.s1().map(|s1| (state.s0(), s1)),
                    Structure::Right => state.s1().map(|s1| (s1, state.s0())),
                };
                match (arc, label) {
                    (Some((head, child)), Some(label))
                        if heads[child] == head && label != deprels[child] =>
                    {
                        base + 1
                    }
                    _ => base,
                }
            })
            .collect()
    }

    fn structure_of(&self, action: Action) -> Structure {
        self.codec.structure(action)
    }
}

fn check_gold(heads: &[UnitId], deprels: &[Label], num_units: usize) {
    assert_eq!(
        heads.len(),
        deprels.len(),
        "#heads should be equal to #deprels"
    );
    assert_eq!(
        heads.len(),
        num_units,
        "gold tree has {} units but the state has {}",
        heads.len(),
        num_units
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NO_LABEL, ROOT};

    const N: UnitId = NO_HEAD;
    const X: Label = NO_LABEL;

    fn system() -> ArcStandard {
        ArcStandard::with_labels(["root", "obj", "nsubj"])
    }

    #[test]
    fn test_action_space() {
        let sys = system();
        assert_eq!(sys.num_actions(), 7);
        assert_eq!(sys.shift_id(), Action::SHIFT);
        assert_eq!(sys.left_id(2).id(), 3);
        assert_eq!(sys.right_id(0).id(), 4);
        assert_eq!(sys.parse_label(sys.right_id(1)), Some(1));
        assert_eq!(sys.parse_label(Action::SHIFT), None);
        assert!(sys.is_shift(Action::SHIFT));
        assert!(sys.is_left(Action::new(1)));
        assert!(sys.is_right(Action::new(6)));
        assert!(!sys.is_right(Action::new(7)));
        assert_eq!(sys.name(), "arc-standard");
        assert!(!sys.allow_nonprojective());
    }

    #[test]
    fn test_action_names() {
        let sys = system();
        assert_eq!(sys.action_name(Action::SHIFT), "SHIFT");
        assert_eq!(sys.action_name(sys.left_id(2)), "LEFT-ARC(nsubj)");
        assert_eq!(sys.action_name(sys.right_id(1)), "RIGHT-ARC(obj)");
        assert_eq!(ArcStandard::new(2).action_name(Action::new(3)), "RIGHT-ARC(0)");
    }

    #[test]
    fn test_validity_on_initial_state() {
        let sys = system();
        let state = sys.initial_state(3);
        assert_eq!(sys.valid_actions(&state), vec![Action::SHIFT]);
        assert!(!sys.is_valid_action(&state, sys.left_id(0)));
        assert!(!sys.is_valid_action(&state, sys.right_id(0)));
    }

    #[test]
    fn test_left_arc_never_takes_root_as_dependent() {
        let sys = system();
        let mut state = sys.initial_state(3);
        sys.perform_action(&mut state, Action::SHIFT);
        assert!(!sys.is_valid_action(&state, sys.left_id(0)));
        assert!(sys.is_valid_action(&state, sys.right_id(0)));
        assert!(sys.is_valid_action(&state, Action::SHIFT));
    }

    #[test]
    fn test_out_of_range_action_is_invalid() {
        let sys = system();
        let mut state = sys.initial_state(3);
        sys.perform_action(&mut state, Action::SHIFT);
        assert!(!sys.is_valid_action(&state, Action::new(7)));
    }

    #[test]
    #[should_panic(expected = "invalid action LEFT-ARC(root)")]
    fn test_invalid_action_panics() {
        let sys = system();
        let mut state = sys.initial_state(3);
        sys.perform_action(&mut state, sys.left_id(0));
    }

    #[test]
    fn test_root_obj_example() {
        // ROOT A B, A <- ROOT (root), B <- A (obj)
        let sys = system();
        let heads = vec![N, 0, 1];
        let deprels = vec![X, 0, 1];
        let actions = sys.oracle_actions(&heads, &deprels);
        assert_eq!(
            actions,
            vec![Action::SHIFT, Action::SHIFT, sys.right_id(1), sys.right_id(0)]
        );

        let mut state = sys.initial_state(3);
        for action in actions {
            sys.perform_action(&mut state, action);
        }
        assert!(state.is_terminal());
        assert_eq!(state.stack(), &[ROOT]);
        assert_eq!(state.heads(), heads.as_slice());
        assert_eq!(state.deprels(), deprels.as_slice());
        assert_eq!(state.history().len(), 4);
    }

    #[test]
    fn test_left_arc_in_oracle() {
        // ROOT A B, A <- B (nsubj), B <- ROOT (root)
        let sys = system();
        let actions = sys.oracle_actions(&[N, 2, 0], &[X, 2, 0]);
        assert_eq!(
            actions,
            vec![Action::SHIFT, Action::SHIFT, sys.left_id(2), sys.right_id(0)]
        );
    }

    #[test]
    fn test_dependent_waits_for_its_children() {
        // 1 <- 0, 2 <- 1, 3 <- 2: right chain, nothing reduces early
        let sys = ArcStandard::new(1);
        let actions = sys.oracle_actions(&[N, 0, 1, 2], &[X, 0, 0, 0]);
        let names: Vec<String> = actions.iter().map(|&a| sys.action_name(a)).collect();
        assert_eq!(
            names,
            vec![
                "SHIFT",
                "SHIFT",
                "SHIFT",
                "RIGHT-ARC(0)",
                "RIGHT-ARC(0)",
                "RIGHT-ARC(0)"
            ]
        );
    }

    #[test]
    fn test_root_only_sentence() {
        let sys = ArcStandard::new(1);
        assert!(sys.oracle_actions(&[N], &[X]).is_empty());
        assert_eq!(sys.oracle_action_onestep(&[N], &[X], &State::new(1)), None);
    }

    #[test]
    fn test_nonprojective_tree_terminates() {
        // 1 <- 3, 2 <- 0, 3 <- 2
        let sys = ArcStandard::new(1);
        let heads = vec![N, 3, 0, 2];
        let actions = sys.oracle_actions(&heads, &[X, 0, 0, 0]);
        assert_eq!(actions.len(), 6);

        let mut state = sys.initial_state(4);
        for action in actions {
            sys.perform_action(&mut state, action);
        }
        assert!(state.is_terminal());
        assert_ne!(state.heads(), heads.as_slice());
    }

    #[test]
    fn test_onestep_matches_full_derivation() {
        let sys = system();
        let heads = vec![N, 2, 0, 4, 2];
        let deprels = vec![X, 2, 0, 2, 1];
        let full = sys.oracle_actions(&heads, &deprels);

        let mut state = sys.initial_state(heads.len());
        let mut stepped = Vec::new();
        while let Some(action) = sys.oracle_action_onestep(&heads, &deprels, &state) {
            sys.perform_action(&mut state, action);
            stepped.push(action);
        }
        assert_eq!(stepped, full);
    }

    #[test]
    fn test_onestep_recovers_after_a_wrong_shift() {
        // 1 <- 2, 2 <- 0, 3 <- 2; SHIFT instead of LEFT-ARC at [ROOT, 1, 2]
        let sys = ArcStandard::new(1);
        let heads = vec![N, 2, 0, 2];
        let deprels = vec![X, 0, 0, 0];
        let mut state = sys.initial_state(4);
        for _ in 0..3 {
            sys.perform_action(&mut state, Action::SHIFT);
        }
        assert_eq!(
            sys.oracle_action_onestep(&heads, &deprels, &state),
            Some(sys.right_id(0))
        );
    }

    #[test]
    fn test_costs_on_gold_path_are_zero_for_oracle_action() {
        let sys = system();
        let heads = vec![N, 2, 0, 4, 2];
        let deprels = vec![X, 2, 0, 2, 1];
        let mut state = sys.initial_state(heads.len());
        for action in sys.oracle_actions(&heads, &deprels) {
            let costs = sys.transition_costs(&state, &[action], &heads, &deprels);
            assert_eq!(costs, vec![0]);
            sys.perform_action(&mut state, action);
        }
    }

    #[test]
    fn test_wrong_label_costs_one() {
        let sys = system();
        let heads = vec![N, 0];
        let deprels = vec![X, 0];
        let mut state = sys.initial_state(2);
        sys.perform_action(&mut state, Action::SHIFT);
        let candidates = [sys.right_id(0), sys.right_id(1), sys.right_id(2)];
        assert_eq!(
            sys.transition_costs(&state, &candidates, &heads, &deprels),
            vec![0, 1, 1]
        );
    }

    #[test]
    fn test_label_is_free_on_a_wrong_head() {
        // 1 <- 0, 2 <- 1 at [ROOT, 1, 2]: LEFT-ARC puts 1 under the wrong head
        let sys = ArcStandard::new(2);
        let heads = vec![N, 0, 1];
        let deprels = vec![X, 0, 0];
        let mut state = sys.initial_state(3);
        sys.perform_action(&mut state, Action::SHIFT);
        sys.perform_action(&mut state, Action::SHIFT);

        let candidates = [sys.left_id(0), sys.left_id(1), sys.right_id(0), sys.right_id(1)];
        assert_eq!(
            sys.transition_costs(&state, &candidates, &heads, &deprels),
            vec![2, 2, 0, 1]
        );
    }

    #[test]
    fn test_shift_burying_a_dependent_costs_one() {
        // 1 <- 0, 2 <- 1, 3 <- 1 at [ROOT, 1, 2 | 3]: 2 must reduce first
        let sys = ArcStandard::new(1);
        let heads = vec![N, 0, 1, 1];
        let deprels = vec![X, 0, 0, 0];
        let mut state = sys.initial_state(4);
        sys.perform_action(&mut state, Action::SHIFT);
        sys.perform_action(&mut state, Action::SHIFT);

        let candidates = sys.valid_actions(&state);
        assert_eq!(candidates, vec![Action::SHIFT, sys.left_id(0), sys.right_id(0)]);
        assert_eq!(
            sys.transition_costs(&state, &candidates, &heads, &deprels),
            vec![1, 3, 0]
        );
        assert_eq!(
            sys.dynamic_oracle_actions(&state, &heads, &deprels),
            vec![sys.right_id(0)]
        );
    }

    #[test]
    fn test_costs_do_not_touch_the_state() {
        let sys = ArcStandard::new(1);
        let heads = vec![N, 0, 1];
        let deprels = vec![X, 0, 0];
        let mut state = sys.initial_state(3);
        sys.perform_action(&mut state, Action::SHIFT);
        let snapshot = state.clone();
        let candidates = sys.valid_actions(&state);
        sys.transition_costs(&state, &candidates, &heads, &deprels);
        assert_eq!(state, snapshot);
    }

    #[test]
    #[should_panic(expected = "cannot cost invalid action")]
    fn test_costing_invalid_action_panics() {
        let sys = ArcStandard::new(1);
        let state = sys.initial_state(2);
        sys.transition_costs(&state, &[sys.right_id(0)], &[N, 0], &[X, 0]);
    }

    #[test]
    #[should_panic(expected = "#heads should be equal to #deprels")]
    fn test_mismatched_gold_arrays_panic() {
        ArcStandard::new(1).oracle_actions(&[N, 0], &[X]);
    }

    #[test]
    fn test_cost_of_configuration() {
        let sys = ArcStandard::new(1);
        let heads = vec![N, 0, 1];
        let deprels = vec![X, 0, 0];
        let mut state = sys.initial_state(3);
        assert_eq!(sys.cost(&state, &heads, &deprels), 0);
        sys.perform_action(&mut state, Action::SHIFT);
        sys.perform_action(&mut state, sys.right_id(0));
        assert_eq!(sys.cost(&state, &heads, &deprels), 1);
    }
}
