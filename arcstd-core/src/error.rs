//! Core error types (deterministic only)
//!
//! Contract violations inside the transition system (invalid actions,
//! out-of-range labels) panic. The errors below cover data-driven checks
//! that callers run on gold trees before handing them to the oracles.

use thiserror::Error;

use crate::{Label, UnitId};

/// Errors raised while validating dependency trees
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A tree must contain at least the artificial ROOT unit
    #[error("tree has no units (ROOT is missing)")]
    Empty,

    /// Head and label arrays disagree in length
    #[error("length mismatch: {heads} heads but {deprels} labels")]
    LengthMismatch {
        /// Number of head entries
        heads: usize,
        /// Number of label entries
        deprels: usize,
    },

    /// ROOT was given a governor
    #[error("ROOT must not have a head, found {head}")]
    RootHasHead {
        /// The head that was assigned to ROOT
        head: UnitId,
    },

    /// A real unit has no governor
    #[error("unit {unit} has no head")]
    MissingHead {
        /// The headless unit
        unit: UnitId,
    },

    /// Governor index outside the sentence
    #[error("head {head} of unit {unit} is out of range for {len} units")]
    HeadOutOfRange {
        /// The dependent unit
        unit: UnitId,
        /// The offending head index
        head: UnitId,
        /// Number of units including ROOT
        len: usize,
    },

    /// A unit governs itself
    #[error("unit {unit} is its own head")]
    SelfLoop {
        /// The offending unit
        unit: UnitId,
    },

    /// Following heads from a unit never reaches ROOT
    #[error("cycle detected through unit {unit}")]
    Cycle {
        /// A unit on the cycle
        unit: UnitId,
    },

    /// Label id outside the label vocabulary
    #[error("label {label} of unit {unit} is out of range for {num_labels} labels")]
    LabelOutOfRange {
        /// The dependent unit
        unit: UnitId,
        /// The offending label id
        label: Label,
        /// Size of the label vocabulary
        num_labels: usize,
    },

    /// Two arcs cross
    #[error("tree is non-projective: arc to unit {unit} crosses another arc")]
    NonProjective {
        /// Dependent of one of the crossing arcs
        unit: UnitId,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::LengthMismatch {
            heads: 3,
            deprels: 2,
        };
        assert_eq!(err.to_string(), "length mismatch: 3 heads but 2 labels");

        let err = CoreError::HeadOutOfRange {
            unit: 2,
            head: 9,
            len: 4,
        };
        assert_eq!(
            err.to_string(),
            "head 9 of unit 2 is out of range for 4 units"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        let err = CoreError::Cycle { unit: 1 };
        let _: &dyn std::error::Error = &err;
        assert!(format!("{err:?}").contains("Cycle"));
    }
}
