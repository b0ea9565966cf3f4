use agentbench_core::{Result, SUMMARY_FILE};
use anyhow::anyhow;
use std::fs;
use std::path::Path;

use crate::child_names;

/// Walk the results tree and return every experiment with at least one
/// locatable eval record. Existence only; validity is the collector's job.
/// Output is sorted so a discovery-driven export is deterministic.
///
/// The results root itself must be readable; anything below it that is not
/// counts as zero children.
pub fn discover_experiments(results_dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(results_dir)
        .map_err(|err| anyhow!("cannot read results root {}: {err}", results_dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        if has_any_summary(&results_dir.join(&name)) {
            found.push(name);
        }
    }
    found.sort();
    Ok(found)
}

/// Depth-first probe for a single `summary.json`, bailing out at the first
/// hit: one qualifying eval qualifies the execution, one qualifying
/// execution qualifies the experiment.
fn has_any_summary(experiment_dir: &Path) -> bool {
    for execution in child_names(experiment_dir) {
        let run_dir = experiment_dir.join(&execution);
        for eval_id in child_names(&run_dir) {
            if run_dir.join(&eval_id).join(SUMMARY_FILE).is_file() {
                return true;
            }
        }
    }
    false
}
