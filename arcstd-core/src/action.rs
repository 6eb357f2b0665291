//! Action encoding
//!
//! Actions are compact integer ids. With `L` labels the layout is:
//!
//! | id            | meaning                  |
//! |---------------|--------------------------|
//! | `0`           | SHIFT                    |
//! | `1..=L`       | LEFT-ARC(label = id - 1) |
//! | `L+1..=2L`    | RIGHT-ARC(label = id-L-1)|

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Label;

/// Coarse move of an action, with the label stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Structure {
    /// Move the buffer head onto the stack
    Shift,
    /// Attach the second stack element under the top
    Left,
    /// Attach the top stack element under the second
    Right,
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Structure::Shift => write!(f, "SHIFT"),
            Structure::Left => write!(f, "LEFT-ARC"),
            Structure::Right => write!(f, "RIGHT-ARC"),
        }
    }
}

/// Integer-encoded transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Action(usize);

impl Action {
    /// The SHIFT action (id 0 under every label vocabulary)
    pub const SHIFT: Action = Action(0);

    /// Wrap a raw action id
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Raw action id
    pub const fn id(self) -> usize {
        self.0
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> usize {
        action.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bidirectional mapping between action ids and `(Structure, label)` pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCodec {
    num_labels: usize,
}

impl ActionCodec {
    /// Create a codec for a label vocabulary of `num_labels` entries
    pub const fn new(num_labels: usize) -> Self {
        Self { num_labels }
    }

    /// Size of the label vocabulary
    pub const fn num_labels(&self) -> usize {
        self.num_labels
    }

    /// Total number of actions, `2L + 1`
    pub const fn num_actions(&self) -> usize {
        2 * self.num_labels + 1
    }

    /// The SHIFT action
    pub const fn shift(&self) -> Action {
        Action::SHIFT
    }

    /// LEFT-ARC with `label`
    ///
    /// # Panics
    /// Panics if `label` is outside the vocabulary.
    pub fn left(&self, label: Label) -> Action {
        self.check_label(label);
        Action(1 + label)
    }

    /// RIGHT-ARC with `label`
    ///
    /// # Panics
    /// Panics if `label` is outside the vocabulary.
    pub fn right(&self, label: Label) -> Action {
        self.check_label(label);
        Action(1 + self.num_labels + label)
    }

    /// Encode a structure/label pair. The label is ignored for SHIFT.
    pub fn encode(&self, structure: Structure, label: Label) -> Action {
        match structure {
            Structure::Shift => self.shift(),
            Structure::Left => self.left(label),
            Structure::Right => self.right(label),
        }
    }

    /// Decode an action id, or `None` if it is outside the action space
    pub fn try_decode(&self, action: Action) -> Option<(Structure, Option<Label>)> {
        let id = action.0;
        let l = self.num_labels;
        if id == 0 {
            Some((Structure::Shift, None))
        } else if id <= l {
            Some((Structure::Left, Some(id - 1)))
        } else if id <= 2 * l {
            Some((Structure::Right, Some(id - l - 1)))
        } else {
            None
        }
    }

    /// Decode an action id
    ///
    /// # Panics
    /// Panics if the id is outside the action space.
    pub fn decode(&self, action: Action) -> (Structure, Option<Label>) {
        self.try_decode(action).unwrap_or_else(|| {
            panic!(
                "action id {} out of range for {} actions",
                action.0,
                self.num_actions()
            )
        })
    }

    /// Coarse move of an action
    pub fn structure(&self, action: Action) -> Structure {
        self.decode(action).0
    }

    /// Label carried by an arc action, `None` for SHIFT
    pub fn label(&self, action: Action) -> Option<Label> {
        self.decode(action).1
    }

    /// Whether the id is inside the action space
    pub fn contains(&self, action: Action) -> bool {
        action.0 < self.num_actions()
    }

    fn check_label(&self, label: Label) {
        assert!(
            label < self.num_labels,
            "label {label} out of range for {} labels",
            self.num_labels
        );
    }
}
