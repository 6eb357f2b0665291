//! Output formatting module

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Oracle derivation of one sentence, ready for printing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// File the sentence came from
    pub file: String,
    /// 0-based position of the sentence in its file
    pub index: usize,
    /// Raw sentence text
    pub text: String,
    /// Number of real words
    pub num_words: usize,
    /// Whether the gold tree is projective
    pub projective: bool,
    /// Whether the oracle sequence rebuilds the gold tree
    pub reproduces: bool,
    /// Action names, in order
    pub actions: Vec<String>,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output a single sentence
    fn format_sentence(&mut self, record: &SentenceRecord) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

#[cfg(test)]
pub(crate) fn sample_record() -> SentenceRecord {
    SentenceRecord {
        file: "dev.conllu".to_string(),
        index: 0,
        text: "Dogs bark".to_string(),
        num_words: 2,
        projective: true,
        reproduces: true,
        actions: vec![
            "SHIFT".to_string(),
            "SHIFT".to_string(),
            "LEFT-ARC(nsubj)".to_string(),
            "RIGHT-ARC(root)".to_string(),
        ],
    }
}
