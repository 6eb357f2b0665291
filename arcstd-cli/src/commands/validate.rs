//! Validate command implementation

use anyhow::Result;
use arcstd_core::{ArcStandard, GoldTree};
use arcstd_engine::{ExecutionMode, NonProjectivePolicy, OracleProcessorBuilder};
use clap::Args;

use super::{init_logging, Treebank};
use crate::error::CliError;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Input CoNLL-U files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Per-file tallies
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct FileReport {
    sentences: usize,
    invalid: usize,
    nonprojective: usize,
    unreproduced: usize,
}

impl FileReport {
    fn is_ok(&self) -> bool {
        self.invalid == 0 && self.unreproduced == 0
    }
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, false);

        let treebank = Treebank::load(&self.input, true)?;
        let system = ArcStandard::with_labels(treebank.vocab.names().iter().cloned());
        // Non-projective trees are kept so their derivations are checked too
        let processor = OracleProcessorBuilder::from_system(system)
            .execution_mode(ExecutionMode::Sequential)
            .nonprojective(NonProjectivePolicy::Keep)
            .build()
            .map_err(|e| CliError::ProcessingError(e.to_string()))?;

        let mut failed = 0;
        for (path, sentences) in &treebank.files {
            let file = path.display().to_string();
            let mut report = FileReport {
                sentences: sentences.len(),
                ..FileReport::default()
            };

            let mut trees: Vec<GoldTree> = Vec::with_capacity(sentences.len());
            for sentence in sentences {
                match sentence.to_gold(&treebank.vocab) {
                    Ok(tree) => {
                        if !tree.is_projective() {
                            report.nonprojective += 1;
                        }
                        trees.push(tree);
                    }
                    Err(e) => {
                        report.invalid += 1;
                        println!("  ✗ {file}:{}: {e}", sentence.line);
                    }
                }
            }

            let derived = processor
                .derive(&trees)
                .map_err(|e| CliError::ProcessingError(e.to_string()))?;
            report.unreproduced = derived
                .items
                .iter()
                .filter(|d| d.projective && !d.reproduces)
                .count();

            if report.is_ok() {
                println!(
                    "✓ {file}: {} sentences, {} non-projective",
                    report.sentences, report.nonprojective
                );
            } else {
                failed += 1;
                println!(
                    "✗ {file}: {} sentences, {} invalid, {} non-projective, {} not reproduced",
                    report.sentences, report.invalid, report.nonprojective, report.unreproduced
                );
            }
        }

        if failed > 0 {
            return Err(anyhow::anyhow!("Validation failed: {failed} file(s) with errors"));
        }
        Ok(())
    }
}
