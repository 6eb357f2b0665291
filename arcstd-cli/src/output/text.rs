//! Plain text output formatter

use super::{OutputFormatter, SentenceRecord};
use anyhow::Result;
use std::io::Write;

/// Plain text formatter - a header line and an action line per sentence
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_sentence(&mut self, record: &SentenceRecord) -> Result<()> {
        let marker = if record.reproduces { "" } else { " [not reproduced]" };
        writeln!(
            self.writer,
            "# {}:{} {}{}",
            record.file, record.index, record.text, marker
        )?;
        writeln!(self.writer, "{}", record.actions.join(" "))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_record;

    #[test]
    fn test_text_layout() {
        let mut formatter = TextFormatter::new(Vec::new());
        formatter.format_sentence(&sample_record()).unwrap();
        formatter.finish().unwrap();
        let out = String::from_utf8(formatter.writer).unwrap();
        assert_eq!(
            out,
            "# dev.conllu:0 Dogs bark\nSHIFT SHIFT LEFT-ARC(nsubj) RIGHT-ARC(root)\n"
        );
    }
}
