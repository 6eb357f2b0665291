use arcstd_cli::commands::Commands;
use clap::Parser;

/// Arc-standard oracle tools for CoNLL-U treebanks
#[derive(Debug, Parser)]
#[command(name = "arcstd", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.command.execute() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
