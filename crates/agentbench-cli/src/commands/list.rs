use agentbench_export::discover_experiments;
use anyhow::Result;

use crate::ListArgs;
use crate::output::print_json;

pub(crate) fn run_list(args: ListArgs, json_mode: bool) -> Result<()> {
    let experiments = discover_experiments(&args.results_dir)?;
    if json_mode {
        print_json(&experiments)?;
    } else if experiments.is_empty() {
        println!("no experiments with recorded results");
    } else {
        for name in &experiments {
            println!("{name}");
        }
    }
    Ok(())
}
