//! Aggregation engine: discovers experiments with recorded results, merges
//! repeated executions (newest valid record wins per eval), and assembles
//! the export report.

use agentbench_core::{ExportReport, NameRegistry, Result};
use std::fs;
use std::path::{Path, PathBuf};

mod collect;
mod report;
mod scan;
mod write;

pub use collect::{CollectOutcome, ExperimentRuns, collect_experiment};
pub use report::ReportBuilder;
pub use scan::discover_experiments;
pub use write::{ReportTotals, write_report};

/// Non-hidden child entry names of a directory. Unreadable directories read
/// as empty: a vanished or permission-broken node skips itself, never its
/// siblings.
pub(crate) fn child_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.'))
        .collect()
}

/// Skip reason for one experiment, surfaced as a console warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The named experiment has no directory under the results root.
    NotFound(String),
    /// The directory exists but no execution yielded a usable record.
    NoValidResults(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotFound(name) => write!(f, "Experiment not found: {name}"),
            SkipReason::NoValidResults(name) => write!(f, "No valid results for: {name}"),
        }
    }
}

/// Ties the pipeline together for one invocation: discovery, per-experiment
/// collection, and report assembly.
pub struct Exporter {
    results_dir: PathBuf,
    config_dir: PathBuf,
    registry: NameRegistry,
}

impl Exporter {
    pub fn new(results_dir: &Path, config_dir: &Path, registry: NameRegistry) -> Self {
        Self {
            results_dir: results_dir.to_path_buf(),
            config_dir: config_dir.to_path_buf(),
            registry,
        }
    }

    /// Experiments under the results root with at least one recorded eval.
    pub fn discover(&self) -> Result<Vec<String>> {
        discover_experiments(&self.results_dir)
    }

    /// Build the report for exactly the given experiments, in the given
    /// order. Experiments that cannot contribute are reported back as skip
    /// reasons, never as errors.
    pub fn build_report(&self, experiments: &[String]) -> (ExportReport, Vec<SkipReason>) {
        let mut skipped = Vec::new();
        let mut builder = ReportBuilder::new(self.registry.clone(), &self.config_dir);
        for name in experiments {
            match collect_experiment(&self.results_dir, name) {
                CollectOutcome::Missing => skipped.push(SkipReason::NotFound(name.clone())),
                CollectOutcome::Empty => skipped.push(SkipReason::NoValidResults(name.clone())),
                CollectOutcome::Ready(runs) => builder.add(runs),
            }
        }
        (builder.finish(), skipped)
    }
}
