//! Markdown output formatter

use super::{OutputFormatter, SentenceRecord};
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - a numbered list with the actions in code spans
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    sentence_count: usize,
    action_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            sentence_count: 0,
            action_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_sentence(&mut self, record: &SentenceRecord) -> Result<()> {
        self.sentence_count += 1;
        self.action_count += record.actions.len();
        writeln!(self.writer, "{}. {}", self.sentence_count, record.text)?;
        writeln!(self.writer, "   `{}`", record.actions.join(" "))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(
            self.writer,
            "*Total sentences: {}, actions: {}*",
            self.sentence_count, self.action_count
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
