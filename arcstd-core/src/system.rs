//! Transition system abstraction
//!
//! Any transition-system family (arc-standard today, arc-eager or swap-based
//! systems later) exposes the same capability set so drivers can stay
//! generic over it.

use crate::{Action, Label, State, Structure, UnitId};

/// Capability set of a transition system
///
/// Implementations are immutable after construction and are shared
/// read-only between parsing tasks, hence the `Send + Sync` bound.
pub trait TransitionSystem: Send + Sync {
    /// Human-readable name of the system family
    fn name(&self) -> &'static str;

    /// Human-readable name of one action, for diagnostics
    fn action_name(&self, action: Action) -> String;

    /// Size of the action space
    fn num_actions(&self) -> usize;

    /// Whether the system can produce crossing arcs
    fn allow_nonprojective(&self) -> bool;

    /// Whether `action` may be executed from `state`
    fn is_valid_action(&self, state: &State, action: Action) -> bool;

    /// Apply `action` to `state`
    ///
    /// # Panics
    /// Panics if the action is not valid in `state`.
    fn perform_action(&self, state: &mut State, action: Action);

    /// Canonical action sequence reproducing the gold tree
    fn oracle_actions(&self, heads: &[UnitId], deprels: &[Label]) -> Vec<Action>;

    /// Dynamic-oracle cost of each candidate from `state`
    ///
    /// The state is left untouched; only hypothetical successors are costed.
    fn transition_costs(
        &self,
        state: &State,
        candidates: &[Action],
        heads: &[UnitId],
        deprels: &[Label],
    ) -> Vec<u32>;

    /// Coarse move of an action
    fn structure_of(&self, action: Action) -> Structure;

    /// Every action executable from `state`, in id order
    fn valid_actions(&self, state: &State) -> Vec<Action> {
        (0..self.num_actions())
            .map(Action::new)
            .filter(|&action| self.is_valid_action(state, action))
            .collect()
    }

    /// Initial configuration for a sentence of `num_units` units, ROOT included
    fn initial_state(&self, num_units: usize) -> State {
        State::new(num_units)
    }
}
