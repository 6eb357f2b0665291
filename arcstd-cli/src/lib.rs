//! arcstd CLI library
//!
//! Reads CoNLL-U treebanks, derives arc-standard oracle action sequences
//! and reports on tree validity.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
