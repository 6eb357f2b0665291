//! File reading utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::conllu::{parse_document, ConlluSentence};

/// Reads treebank files
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Read and parse a CoNLL-U file
    pub fn read_conllu(path: &Path) -> Result<Vec<ConlluSentence>> {
        let content = Self::read_text(path)?;
        let sentences = parse_document(&content, &path.display().to_string())?;
        log::info!("read {} sentences from {}", sentences.len(), path.display());
        Ok(sentences)
    }
}
