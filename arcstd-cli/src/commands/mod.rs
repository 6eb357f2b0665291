//! CLI command implementations

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::{
    input::{resolve_patterns, ConlluSentence, FileReader, LabelVocabulary},
    progress::ProgressReporter,
};

pub mod generate_config;
pub mod oracle;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print static-oracle action sequences for CoNLL-U sentences
    Oracle(oracle::OracleArgs),

    /// Check trees for validity, projectivity and oracle reproduction
    Validate(validate::ValidateArgs),

    /// Write a configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Oracle(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }
}

/// Sentences of every input file plus the label vocabulary they share
#[derive(Debug, Default)]
pub struct Treebank {
    /// Files in resolution order with their sentences
    pub files: Vec<(PathBuf, Vec<ConlluSentence>)>,
    /// Labels in order of first appearance
    pub vocab: LabelVocabulary,
}

impl Treebank {
    /// Resolve `patterns` and read every matching file
    pub fn load(patterns: &[String], quiet: bool) -> Result<Self> {
        let paths = resolve_patterns(patterns)?;
        let mut progress = ProgressReporter::new(quiet);
        progress.init_files(paths.len() as u64);

        let mut treebank = Treebank::default();
        for path in paths {
            let sentences = FileReader::read_conllu(&path)?;
            for sentence in &sentences {
                sentence.collect_labels(&mut treebank.vocab);
            }
            progress.file_completed(&path.display().to_string(), sentences.len());
            treebank.files.push((path, sentences));
        }
        progress.finish();

        log::info!(
            "loaded {} sentences with {} labels",
            treebank.num_sentences(),
            treebank.vocab.len()
        );
        Ok(treebank)
    }

    /// Total number of sentences
    pub fn num_sentences(&self) -> usize {
        self.files.iter().map(|(_, s)| s.len()).sum()
    }
}

/// Initialize logging based on verbosity level
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}
