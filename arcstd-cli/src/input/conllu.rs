//! CoNLL-U reading
//!
//! Sentences are blank-line separated blocks of ten tab-separated columns:
//!
//! ```text
//! ID FORM LEMMA UPOS XPOS FEATS HEAD DEPREL DEPS MISC
//! ```
//!
//! Multiword token ranges (`1-2`) and empty nodes (`1.1`) carry no basic
//! dependency and are skipped. A `# text = ` comment sets the raw sentence;
//! without one it is rebuilt from the forms and `SpaceAfter=No`.

use std::collections::HashMap;

use arcstd_core::{CoreError, GoldTree, Label, UnitId, NO_HEAD, NO_LABEL};

use crate::error::CliError;

const NUM_COLUMNS: usize = 10;
const ROOT_FORM: &str = "<root>";

/// Label vocabulary built from the DEPREL column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelVocabulary {
    names: Vec<String>,
    ids: HashMap<String, Label>,
}

impl LabelVocabulary {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `name`, adding it if unseen
    pub fn insert(&mut self, name: &str) -> Label {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Id of a known label
    pub fn get(&self, name: &str) -> Option<Label> {
        self.ids.get(name).copied()
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no label has been seen
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Label names in id order
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One sentence as read from a CoNLL-U file, ROOT at index 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConlluSentence {
    /// Raw text of the sentence
    pub text: String,
    /// Word forms
    pub forms: Vec<String>,
    /// Heads, `NO_HEAD` at ROOT
    pub heads: Vec<UnitId>,
    /// Dependency relation names, empty at ROOT
    pub deprels: Vec<String>,
    /// Line where the sentence starts
    pub line: usize,
}

impl ConlluSentence {
    /// Number of real words
    pub fn num_words(&self) -> usize {
        self.forms.len() - 1
    }

    /// Register every relation of this sentence in `vocab`
    pub fn collect_labels(&self, vocab: &mut LabelVocabulary) {
        for deprel in self.deprels.iter().skip(1) {
            vocab.insert(deprel);
        }
    }

    /// Convert to a validated gold tree under `vocab`
    ///
    /// Relations missing from the vocabulary map past its end, so they fail
    /// validation with a label error.
    pub fn to_gold(&self, vocab: &LabelVocabulary) -> Result<GoldTree, CoreError> {
        let deprels = self
            .deprels
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == 0 {
                    NO_LABEL
                } else {
                    vocab.get(name).unwrap_or(vocab.len())
                }
            })
            .collect();
        GoldTree::new(self.heads.clone(), deprels, vocab.len())
    }
}

/// Parse every sentence of a CoNLL-U document
///
/// `source` names the document in error messages.
pub fn parse_document(content: &str, source: &str) -> Result<Vec<ConlluSentence>, CliError> {
    let mut sentences = Vec::new();
    let mut builder = SentenceBuilder::new(1);

    for (offset, raw) in content.lines().enumerate() {
        let line_no = offset + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            if let Some(sentence) = builder.finish() {
                sentences.push(sentence);
            }
            builder = SentenceBuilder::new(line_no + 1);
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(text) = comment.trim_start().strip_prefix("text = ") {
                builder.text = Some(text.to_string());
            }
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != NUM_COLUMNS {
            return Err(format_error(
                source,
                line_no,
                format!(
                    "expected {NUM_COLUMNS} columns, found {}",
                    columns.len()
                ),
            ));
        }
        let id = columns[0];
        if id.contains('-') || id.contains('.') {
            continue;
        }

        let id: usize = id
            .parse()
            .map_err(|_| format_error(source, line_no, format!("invalid ID '{id}'")))?;
        if id != builder.forms.len() {
            return Err(format_error(
                source,
                line_no,
                format!("expected ID {}, found {id}", builder.forms.len()),
            ));
        }
        let head: usize = columns[6].parse().map_err(|_| {
            format_error(source, line_no, format!("invalid HEAD '{}'", columns[6]))
        })?;

        builder.forms.push(columns[1].to_string());
        builder.heads.push(head);
        builder.deprels.push(columns[7].to_string());
        builder.guessed.push_str(columns[1]);
        if !columns[9].split('|').any(|m| m == "SpaceAfter=No") {
            builder.guessed.push(' ');
        }
    }

    if let Some(sentence) = builder.finish() {
        sentences.push(sentence);
    }
    Ok(sentences)
}

fn format_error(source: &str, line: usize, message: String) -> CliError {
    CliError::FormatError {
        source: source.to_string(),
        line,
        message,
    }
}

struct SentenceBuilder {
    text: Option<String>,
    forms: Vec<String>,
    heads: Vec<UnitId>,
    deprels: Vec<String>,
    guessed: String,
    line: usize,
}

impl SentenceBuilder {
    fn new(line: usize) -> Self {
        Self {
            text: None,
            forms: vec![ROOT_FORM.to_string()],
            heads: vec![NO_HEAD],
            deprels: vec![String::new()],
            guessed: String::new(),
            line,
        }
    }

    fn finish(self) -> Option<ConlluSentence> {
        if self.forms.len() == 1 {
            return None;
        }
        let text = self
            .text
            .unwrap_or_else(|| self.guessed.trim_end().to_string());
        Some(ConlluSentence {
            text,
            forms: self.forms,
            heads: self.heads,
            deprels: self.deprels,
            line: self.line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# sent_id = 1
# text = The cat sat.
1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_
2\tcat\tcat\tNOUN\tNN\t_\t3\tnsubj\t_\t_
3\tsat\tsit\tVERB\tVBD\t_\t0\troot\t_\tSpaceAfter=No
4\t.\t.\tPUNCT\t.\t_\t3\tpunct\t_\t_

1-2\tDon't\t_\t_\t_\t_\t_\t_\t_\t_
1\tDo\tdo\tAUX\tVBP\t_\t3\taux\t_\tSpaceAfter=No
2\tn't\tnot\tPART\tRB\t_\t3\tadvmod\t_\t_
3\tgo\tgo\tVERB\tVB\t_\t0\troot\t_\t_
3.1\tgone\tgo\tVERB\tVB\t_\t_\t_\t_\t_
";

    #[test]
    fn test_parse_sample() {
        let sentences = parse_document(SAMPLE, "sample").unwrap();
        assert_eq!(sentences.len(), 2);

        let first = &sentences[0];
        assert_eq!(first.text, "The cat sat.");
        assert_eq!(first.num_words(), 4);
        assert_eq!(first.heads, vec![NO_HEAD, 2, 3, 0, 3]);
        assert_eq!(first.line, 1);

        let second = &sentences[1];
        assert_eq!(second.forms, vec!["<root>", "Do", "n't", "go"]);
        assert_eq!(second.text, "Don't go");
        assert_eq!(second.line, 8);
    }

    #[test]
    fn test_vocabulary_and_gold_trees() {
        let sentences = parse_document(SAMPLE, "sample").unwrap();
        let mut vocab = LabelVocabulary::new();
        for sentence in &sentences {
            sentence.collect_labels(&mut vocab);
        }
        assert_eq!(vocab.names(), &["det", "nsubj", "root", "punct", "aux", "advmod"]);

        let gold = sentences[0].to_gold(&vocab).unwrap();
        assert_eq!(gold.deprels(), &[NO_LABEL, 0, 1, 2, 3]);
        assert!(gold.is_projective());
    }

    #[test]
    fn test_unknown_label_fails_validation() {
        let sentences = parse_document(SAMPLE, "sample").unwrap();
        let vocab = LabelVocabulary::new();
        assert!(matches!(
            sentences[0].to_gold(&vocab),
            Err(CoreError::LabelOutOfRange { .. })
        ));
    }

    #[test]
    fn test_wrong_column_count() {
        let err = parse_document("1\tThe\tthe\n", "bad.conllu").unwrap_err();
        assert_eq!(err.to_string(), "bad.conllu:1: expected 10 columns, found 3");
    }

    #[test]
    fn test_out_of_sequence_id() {
        let doc = "2\tcat\tcat\tNOUN\tNN\t_\t0\troot\t_\t_\n";
        let err = parse_document(doc, "bad.conllu").unwrap_err();
        assert!(err.to_string().contains("expected ID 1, found 2"));
    }

    #[test]
    fn test_underscore_head_rejected() {
        let doc = "1\tcat\tcat\tNOUN\tNN\t_\t_\troot\t_\t_\n";
        let err = parse_document(doc, "bad.conllu").unwrap_err();
        assert!(err.to_string().contains("invalid HEAD '_'"));
    }

    #[test]
    fn test_blank_lines_only() {
        assert!(parse_document("\n\n", "empty").unwrap().is_empty());
    }
}
