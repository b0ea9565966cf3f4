use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

use crate::{Cli, CompletionsArgs};

pub(crate) fn run_completions(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "agentbench", &mut io::stdout());
    Ok(())
}
