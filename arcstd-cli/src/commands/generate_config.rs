//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "arcstd.toml")]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, Self::generate_template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Use it with:");
        println!(
            "   arcstd oracle -i 'treebank/*.conllu' -c {}",
            self.output.display()
        );

        Ok(())
    }

    /// Template content, matching the built-in defaults
    fn generate_template() -> String {
        r#"# arcstd configuration

[processing]
# Derive oracles for non-projective trees instead of skipping them.
# Their action sequences do not reproduce the gold tree.
keep_nonprojective = false

[output]
# One of "text", "json", "markdown"
default_format = "text"
pretty_json = true

[performance]
# Minimum number of sentences before work is spread across threads
parallel_threshold = 256
# 0 picks the number of CPUs
worker_threads = 0
"#
        .to_string()
    }
}
