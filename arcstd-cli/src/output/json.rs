//! JSON output formatter

use super::{OutputFormatter, SentenceRecord};
use anyhow::Result;
use std::io::Write;

/// JSON formatter - outputs records as one JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    records: Vec<SentenceRecord>,
    pretty: bool,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            records: Vec::new(),
            pretty,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_sentence(&mut self, record: &SentenceRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.records)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.records)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_record;

    #[test]
    fn test_json_array() {
        let mut formatter = JsonFormatter::new(Vec::new(), false);
        formatter.format_sentence(&sample_record()).unwrap();
        formatter.finish().unwrap();

        let parsed: Vec<SentenceRecord> = serde_json::from_slice(&formatter.writer).unwrap();
        assert_eq!(parsed, vec![sample_record()]);
    }

    #[test]
    fn test_empty_output_is_empty_array() {
        let mut formatter = JsonFormatter::new(Vec::new(), false);
        formatter.finish().unwrap();
        assert_eq!(formatter.writer, b"[]\n");
    }
}
