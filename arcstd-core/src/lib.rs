//! Arc-standard transition system for projective dependency parsing
//!
//! This crate holds the parser configuration, the action encoding, the
//! transition-system abstraction and its arc-standard implementation with a
//! static oracle and an exact dynamic-oracle cost. It never scores actions:
//! drivers ask for the valid actions, pick one, and hand it back.
//!
//! # Example
//!
//! ```rust
//! use arcstd_core::{ArcStandard, TransitionSystem, NO_HEAD, NO_LABEL};
//!
//! // ROOT saw her: "saw" <- ROOT (root), "her" <- "saw" (obj)
//! let system = ArcStandard::with_labels(["root", "obj"]);
//! let heads = vec![NO_HEAD, 0, 1];
//! let deprels = vec![NO_LABEL, 0, 1];
//!
//! let actions = system.oracle_actions(&heads, &deprels);
//! assert_eq!(actions.len(), 4);
//!
//! let mut state = system.initial_state(heads.len());
//! for action in actions {
//!     system.perform_action(&mut state, action);
//! }
//! assert!(state.is_terminal());
//! assert_eq!(state.heads(), heads.as_slice());
//! ```

pub mod action;
pub mod arc_standard;
pub mod dynamic_oracle;
pub mod error;
pub mod state;
pub mod system;
pub mod tree;

pub use action::{Action, ActionCodec, Structure};
pub use arc_standard::ArcStandard;
pub use dynamic_oracle::configuration_loss;
pub use error::{CoreError, Result};
pub use state::{Stack, State};
pub use system::TransitionSystem;
pub use tree::{is_projective, validate_tree, AttachmentScore, GoldTree, ParseTree};

/// Index of a unit in a sentence; 0 is ROOT
pub type UnitId = usize;

/// Dependency label id
pub type Label = usize;

/// The artificial root unit
pub const ROOT: UnitId = 0;

/// Head sentinel for ROOT and for units not attached yet
pub const NO_HEAD: UnitId = usize::MAX;

/// Label sentinel for ROOT and for units not attached yet
pub const NO_LABEL: Label = usize::MAX;
