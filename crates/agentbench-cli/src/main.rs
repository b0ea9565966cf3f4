use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod commands;
mod output;

use commands::completions::run_completions;
use commands::export::run_export;
use commands::list::run_list;

#[derive(Parser)]
#[command(name = "agentbench")]
#[command(about = "Aggregate recorded benchmark runs into an export report", long_about = None)]
struct Cli {
    /// Emit machine-readable JSON on stdout instead of human output.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge recorded executions per experiment and write the export
    /// artifact.
    Export(ExportArgs),
    /// List experiments that have at least one recorded eval outcome.
    List(ListArgs),
    /// Generate shell completion scripts.
    Completions(CompletionsArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Experiments to export. Empty exports every discovered experiment.
    experiments: Vec<String>,

    /// Root directory of recorded results.
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Directory holding per-experiment configuration files.
    #[arg(long, default_value = "experiments")]
    config_dir: PathBuf,

    /// Path of the exported report.
    #[arg(long, default_value = "agent-results.json")]
    output: PathBuf,

    /// TOML overlay extending the built-in display-name tables.
    #[arg(long)]
    names: Option<PathBuf>,
}

#[derive(Args)]
struct ListArgs {
    /// Root directory of recorded results.
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,
}

#[derive(Args)]
struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish, powershell, elvish).
    #[arg(value_enum)]
    shell: Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Export(args) => run_export(args, cli.json),
        Command::List(args) => run_list(args, cli.json),
        Command::Completions(args) => run_completions(args),
    }
}
