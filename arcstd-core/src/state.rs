//! Parser configuration
//!
//! A [`State`] holds the stack, the buffer cursor, the arcs built so far and
//! the action history of one sentence. Index 0 is the artificial ROOT unit,
//! seeded on the stack at construction. The buffer is always a suffix of the
//! sentence, so a single cursor describes it.
//!
//! The mutators are crate-private: transition systems are the only code that
//! may change a state, which keeps the single-head and monotone-cursor
//! invariants in one place.

use smallvec::SmallVec;

use crate::{tree::ParseTree, Action, Label, UnitId, NO_HEAD, NO_LABEL, ROOT};

/// Stack storage; most sentences never exceed this depth
pub type Stack = SmallVec<[UnitId; 32]>;

/// Parser configuration for one sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    stack: Stack,
    cursor: UnitId,
    heads: Vec<UnitId>,
    deprels: Vec<Label>,
    history: Vec<Action>,
}

impl State {
    /// Initial configuration for a sentence of `num_units` units, ROOT included
    ///
    /// # Panics
    /// Panics if `num_units` is zero: ROOT must exist.
    pub fn new(num_units: usize) -> Self {
        assert!(num_units >= 1, "a sentence needs at least the ROOT unit");
        let mut stack = Stack::new();
        stack.push(ROOT);
        Self {
            stack,
            cursor: 1,
            heads: vec![NO_HEAD; num_units],
            deprels: vec![NO_LABEL; num_units],
            history: Vec::with_capacity(2 * (num_units - 1)),
        }
    }

    /// Number of units including ROOT
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    /// Whether the sentence has no real units
    pub fn is_empty(&self) -> bool {
        self.heads.len() <= 1
    }

    /// Stack contents, bottom (ROOT) first
    pub fn stack(&self) -> &[UnitId] {
        &self.stack
    }

    /// Number of stack elements
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Top of the stack
    pub fn s0(&self) -> UnitId {
        // ROOT is never popped, so the stack is never empty
        self.stack[self.stack.len() - 1]
    }

    /// Second element from the top
    pub fn s1(&self) -> Option<UnitId> {
        let len = self.stack.len();
        (len >= 2).then(|| self.stack[len - 2])
    }

    /// Buffer head
    pub fn b0(&self) -> Option<UnitId> {
        (self.cursor < self.len()).then_some(self.cursor)
    }

    /// Buffer cursor: the first unprocessed unit
    pub fn cursor(&self) -> UnitId {
        self.cursor
    }

    /// Units still in the buffer
    pub fn buffer(&self) -> core::ops::Range<UnitId> {
        self.cursor..self.len()
    }

    /// Number of units still in the buffer
    pub fn buffer_len(&self) -> usize {
        self.len() - self.cursor
    }

    /// Whether every unit has been shifted
    pub fn is_buffer_empty(&self) -> bool {
        self.cursor >= self.len()
    }

    /// Terminal: buffer exhausted and only ROOT left on the stack
    pub fn is_terminal(&self) -> bool {
        self.is_buffer_empty() && self.stack.len() == 1
    }

    /// Progress measure that strictly decreases with every transition
    pub fn remaining_steps(&self) -> usize {
        2 * self.buffer_len() + self.stack.len() - 1
    }

    /// Governor of `unit`, if it has been attached
    pub fn head_of(&self, unit: UnitId) -> Option<UnitId> {
        let head = self.heads[unit];
        (head != NO_HEAD).then_some(head)
    }

    /// Label of the arc into `unit`, if it has been attached
    pub fn deprel_of(&self, unit: UnitId) -> Option<Label> {
        self.head_of(unit).map(|_| self.deprels[unit])
    }

    /// The arc into `unit` as `(head, label)`
    pub fn arc(&self, unit: UnitId) -> Option<(UnitId, Label)> {
        self.head_of(unit).map(|head| (head, self.deprels[unit]))
    }

    /// Whether `unit` already has a governor
    pub fn is_attached(&self, unit: UnitId) -> bool {
        self.heads[unit] != NO_HEAD
    }

    /// Partial head array (`NO_HEAD` for unattached units)
    pub fn heads(&self) -> &[UnitId] {
        &self.heads
    }

    /// Partial label array (`NO_LABEL` for unattached units)
    pub fn deprels(&self) -> &[Label] {
        &self.deprels
    }

    /// Actions applied so far
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Number of arcs committed so far
    pub fn num_arcs(&self) -> usize {
        self.heads.iter().filter(|&&h| h != NO_HEAD).count()
    }

    /// Read the arcs out as head/label arrays
    pub fn read_out(&self) -> ParseTree {
        ParseTree::new(self.heads.clone(), self.deprels.clone())
    }

    pub(crate) fn shift(&mut self) {
        let unit = self.cursor;
        self.stack.push(unit);
        self.cursor += 1;
    }

    /// Attach s1 under s0 and drop s1
    pub(crate) fn reduce_left(&mut self, label: Label) {
        let len = self.stack.len();
        let head = self.stack[len - 1];
        let child = self.stack[len - 2];
        self.attach(head, child, label);
        self.stack.remove(len - 2);
    }

    /// Attach s0 under s1 and drop s0
    pub(crate) fn reduce_right(&mut self, label: Label) {
        let len = self.stack.len();
        let head = self.stack[len - 2];
        let child = self.stack[len - 1];
        self.attach(head, child, label);
        self.stack.pop();
    }

    pub(crate) fn record(&mut self, action: Action) {
        self.history.push(action);
    }

    fn attach(&mut self, head: UnitId, child: UnitId, label: Label) {
        assert!(
            self.heads[child] == NO_HEAD,
            "unit {child} already has head {}",
            self.heads[child]
        );
        self.heads[child] = head;
        self.deprels[child] = label;
    }
}
