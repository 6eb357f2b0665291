//! Oracle command implementation

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use arcstd_core::{ArcStandard, GoldTree, TransitionSystem};
use arcstd_engine::{ExecutionMode, NonProjectivePolicy, OracleProcessor};
use clap::{Args, ValueEnum};

use super::{init_logging, Treebank};
use crate::{
    config::CliConfig,
    error::CliError,
    output::{JsonFormatter, MarkdownFormatter, OutputFormatter, SentenceRecord, TextFormatter},
};

/// Arguments for the oracle command
#[derive(Debug, Args)]
pub struct OracleArgs {
    /// Input CoNLL-U files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from config, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Derive oracles for non-projective trees instead of skipping them
    #[arg(long)]
    pub keep_nonprojective: bool,

    /// Force parallel processing even for small inputs
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of worker threads
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A header line and an action line per sentence
    Text,
    /// JSON array of sentence records
    Json,
    /// Markdown numbered list
    Markdown,
}

/// Origin of a gold tree handed to the engine
struct Origin<'a> {
    file: String,
    index: usize,
    text: &'a str,
}

impl OracleArgs {
    /// Execute the oracle command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {self:?}");

        let config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_str(&config.output.default_format, true).map_err(|_| {
                CliError::ConfigError(format!(
                    "unknown output format '{}'",
                    config.output.default_format
                ))
            })?,
        };

        let mut engine_config = config.to_engine_config();
        if self.parallel {
            engine_config.execution_mode = ExecutionMode::Parallel;
        }
        if self.threads.is_some() {
            engine_config.threads = self.threads;
        }
        if self.keep_nonprojective {
            engine_config.nonprojective = NonProjectivePolicy::Keep;
        }

        let treebank = Treebank::load(&self.input, self.quiet)?;
        let (trees, origins) = collect_trees(&treebank);

        let system = ArcStandard::with_labels(treebank.vocab.names().iter().cloned());
        let processor = OracleProcessor::with_config(system, engine_config)
            .map_err(|e| CliError::ProcessingError(e.to_string()))?;
        let output = processor
            .derive(&trees)
            .map_err(|e| CliError::ProcessingError(e.to_string()))?;

        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            )),
            None => Box::new(io::stdout()),
        };
        let mut formatter: Box<dyn OutputFormatter> = match format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, config.output.pretty_json)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        };

        for derivation in &output.items {
            let origin = &origins[derivation.index];
            let record = SentenceRecord {
                file: origin.file.clone(),
                index: origin.index,
                text: origin.text.to_string(),
                num_words: derivation.num_words,
                projective: derivation.projective,
                reproduces: derivation.reproduces,
                actions: derivation
                    .actions
                    .iter()
                    .map(|&a| processor.system().action_name(a))
                    .collect(),
            };
            formatter.format_sentence(&record)?;
        }
        formatter.finish()?;

        if !self.quiet {
            eprintln!(
                "Derived {} oracle sequences ({} non-projective skipped, {} invalid trees skipped)",
                output.metrics.sentences,
                output.metrics.skipped,
                treebank.num_sentences() - trees.len()
            );
        }
        Ok(())
    }
}

/// Validated gold trees and where each came from; invalid trees are skipped
fn collect_trees(treebank: &Treebank) -> (Vec<GoldTree>, Vec<Origin<'_>>) {
    let mut trees = Vec::new();
    let mut origins = Vec::new();
    for (path, sentences) in &treebank.files {
        let file = path.display().to_string();
        for (index, sentence) in sentences.iter().enumerate() {
            match sentence.to_gold(&treebank.vocab) {
                Ok(tree) => {
                    trees.push(tree);
                    origins.push(Origin {
                        file: file.clone(),
                        index,
                        text: &sentence.text,
                    });
                }
                Err(e) => log::warn!("{file}:{}: skipping invalid tree: {e}", sentence.line),
            }
        }
    }
    (trees, origins)
}
