//! Input handling module

pub mod conllu;
pub mod file_reader;
pub mod glob_resolver;

pub use conllu::{parse_document, ConlluSentence, LabelVocabulary};
pub use file_reader::FileReader;
pub use glob_resolver::resolve_patterns;
