//! Exact configuration loss for arc-standard
//!
//! The loss of a configuration is the smallest number of wrong attachments
//! (head or label) of any complete tree that can still be built from it.
//! The cost of a transition is the loss it adds: `loss(next) - loss(current)`.
//!
//! Committed arcs contribute directly. For the units still on the stack or
//! in the buffer, the reachable completions are exactly the projective trees
//! over `stack ++ buffer`, rooted at ROOT, in which every stack element
//! strictly between ROOT and the top is either
//!
//! - a childless dependent of a unit to its right, or
//! - an ancestor of the top element.
//!
//! Every later arc between two stack elements is built with the right-hand
//! element on top of the stack, after the current top has been shifted, so
//! the right-hand element must already dominate the top. The best completion
//! is found with a first-order projective (Eisner) chart whose spans headed
//! by such "pinned" stack elements may not stop short of the top.

use crate::{Label, State, UnitId};

const NEG: i32 = i32::MIN / 4;

/// Minimum number of wrong attachments over all completions of `state`
///
/// # Panics
/// Panics if the gold arrays do not match the sentence length.
pub fn configuration_loss(state: &State, heads: &[UnitId], deprels: &[Label]) -> u32 {
    assert!(
        heads.len() == state.len() && deprels.len() == state.len(),
        "gold arrays have {} heads and {} labels for {} units",
        heads.len(),
        deprels.len(),
        state.len()
    );

    let committed = (1..state.len())
        .filter(|&unit| match state.arc(unit) {
            Some((head, label)) => head != heads[unit] || label != deprels[unit],
            None => false,
        })
        .count() as u32;

    let units: Vec<UnitId> = state.stack().iter().copied().chain(state.buffer()).collect();
    let top = state.stack_len() - 1;
    let remaining = (units.len() - 1) as u32;
    committed + remaining - best_completion(&units, top, heads)
}

/// Most gold arcs a reachable completion over `units` can contain
///
/// `units[0]` is ROOT and `units[top]` is the top of the stack.
fn best_completion(units: &[UnitId], top: usize, gold: &[UnitId]) -> u32 {
    let n = units.len();
    if n <= 1 {
        return 0;
    }

    let pinned = |i: usize| i > 0 && i < top;
    let arc = |head: usize, dep: usize| i32::from(gold[units[dep]] == units[head]);

    // complete spans headed at the left end / right end
    let mut right_complete = Chart::new(n);
    let mut left_complete = Chart::new(n);
    // incomplete spans: head s -> dependent t
    let mut right_open = Chart::new(n);
    // incomplete spans: head t -> dependent s, split on whether s stays a leaf
    let mut left_open_leaf = Chart::new(n);
    let mut left_open_wide = Chart::new(n);

    for i in 0..n {
        right_complete.set(i, i, 0);
        left_complete.set(i, i, 0);
    }

    for width in 1..n {
        for s in 0..n - width {
            let t = s + width;

            let mut inner = NEG;
            for r in s..t {
                inner = inner.max(add(right_complete.get(s, r), left_complete.get(r + 1, t)));
            }
            right_open.set(s, t, add(inner, arc(s, t)));

            // ROOT is never a dependent
            if s > 0 {
                let leaf = left_complete.get(s + 1, t);
                let mut wide = NEG;
                for r in s + 1..t {
                    wide = wide.max(add(right_complete.get(s, r), left_complete.get(r + 1, t)));
                }
                left_open_leaf.set(s, t, add(leaf, arc(t, s)));
                left_open_wide.set(s, t, add(wide, arc(t, s)));
            }

            let mut best = NEG;
            for d in s..t {
                // a pinned dependent with children of its own must reach the top
                let attach = if pinned(d) && d > s {
                    left_open_wide.get(d, t)
                } else {
                    left_open_leaf.get(d, t).max(left_open_wide.get(d, t))
                };
                best = best.max(add(left_complete.get(s, d), attach));
            }
            left_complete.set(s, t, best);

            let mut best = NEG;
            if !(pinned(s) && t < top) {
                for d in s + 1..=t {
                    if pinned(d) && t < top {
                        continue;
                    }
                    best = best.max(add(right_open.get(s, d), right_complete.get(d, t)));
                }
            }
            right_complete.set(s, t, best);
        }
    }

    right_complete.get(0, n - 1).max(0) as u32
}

fn add(a: i32, b: i32) -> i32 {
    if a <= NEG || b <= NEG {
        NEG
    } else {
        a + b
    }
}

/// Dense upper-triangular score table
struct Chart {
    n: usize,
    cells: Vec<i32>,
}

impl Chart {
    fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![NEG; n * n],
        }
    }

    fn get(&self, s: usize, t: usize) -> i32 {
        self.cells[s * self.n + t]
    }

    fn set(&mut self, s: usize, t: usize, value: i32) {
        self.cells[s * self.n + t] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NO_HEAD, NO_LABEL};

    const N: UnitId = NO_HEAD;
    const X: Label = NO_LABEL;

    fn state_after(num_units: usize, steps: &[&str]) -> State {
        let mut state = State::new(num_units);
        for step in steps {
            match *step {
                "S" => state.shift(),
                "L" => state.reduce_left(0),
                "R" => state.reduce_right(0),
                other => panic!("unknown step {other}"),
            }
        }
        state
    }

    #[test]
    fn test_initial_loss_is_zero_for_projective_gold() {
        let heads = vec![N, 2, 0, 2];
        let deprels = vec![X, 0, 0, 0];
        let state = State::new(4);
        assert_eq!(configuration_loss(&state, &heads, &deprels), 0);
    }

    #[test]
    fn test_initial_loss_counts_unreachable_crossing_arc() {
        // 1 <- 3, 2 <- 0, 3 <- 2 crosses: one arc is always lost
        let heads = vec![N, 3, 0, 2];
        let deprels = vec![X, 0, 0, 0];
        let state = State::new(4);
        assert_eq!(configuration_loss(&state, &heads, &deprels), 1);
    }

    #[test]
    fn test_buried_dependent_loses_an_arc() {
        // 1 <- 0, 2 <- 1, 3 <- 1: with [ROOT, 1, 2, 3] on the stack, 2 and 3
        // cannot both end up under 1
        let heads = vec![N, 0, 1, 1];
        let deprels = vec![X, 0, 0, 0];
        let before = state_after(4, &["S", "S"]);
        assert_eq!(configuration_loss(&before, &heads, &deprels), 0);

        let after = state_after(4, &["S", "S", "S"]);
        assert_eq!(configuration_loss(&after, &heads, &deprels), 1);
    }

    #[test]
    fn test_committed_wrong_label_counts() {
        let heads = vec![N, 0];
        let deprels = vec![X, 1];
        let state = state_after(2, &["S", "R"]);
        assert_eq!(configuration_loss(&state, &heads, &deprels), 1);
    }

    #[test]
    fn test_popped_head_orphans_its_dependents() {
        // 1 <- 0, 2 <- 1; reducing 1 before 2 is shifted loses 2's arc
        let heads = vec![N, 0, 1];
        let deprels = vec![X, 0, 0];
        let state = state_after(3, &["S", "R"]);
        assert_eq!(configuration_loss(&state, &heads, &deprels), 1);
    }

    #[test]
    fn test_left_dependent_of_pinned_element_needs_top() {
        // 2 <- 0, 1 <- 2, 3 <- 0 and the stack holds [ROOT, 1, 2, 3]:
        // 1 can no longer attach to 2 unless 2 dominates 3
        let heads = vec![N, 2, 0, 0];
        let deprels = vec![X, 0, 0, 0];
        let state = state_after(4, &["S", "S", "S"]);
        assert_eq!(configuration_loss(&state, &heads, &deprels), 1);
    }
}
