use agentbench_core::{
    AgentResult, ExperimentEntry, ExportReport, NameRegistry, ReportMetadata, harness_for,
};
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::collect::ExperimentRuns;

/// Accumulates per-experiment accepted records into the final export
/// document.
pub struct ReportBuilder {
    registry: NameRegistry,
    config_dir: PathBuf,
    experiments: Vec<ExperimentEntry>,
    results: IndexMap<String, Vec<AgentResult>>,
}

impl ReportBuilder {
    pub fn new(registry: NameRegistry, config_dir: &Path) -> Self {
        Self {
            registry,
            config_dir: config_dir.to_path_buf(),
            experiments: Vec::new(),
            results: IndexMap::new(),
        }
    }

    /// Fold one experiment into the report. The experiment's batch is
    /// sorted by eval path before insertion; when two experiments resolve
    /// to the same display name the batches are concatenated, never
    /// re-merged.
    pub fn add(&mut self, mut runs: ExperimentRuns) {
        runs.records.sort_by(|a, b| a.eval_path.cmp(&b.eval_path));

        let model_name = self.registry.display_model(&runs.name);
        let agent_harness = harness_for(&self.config_dir, &runs.name, &self.registry);
        self.experiments.push(ExperimentEntry {
            name: runs.name,
            timestamp: runs.timestamp,
            model_name: model_name.clone(),
            agent_harness,
        });
        self.results
            .entry(model_name)
            .or_default()
            .extend(runs.records);
    }

    pub fn finish(self) -> ExportReport {
        ExportReport {
            metadata: ReportMetadata {
                exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                experiments: self.experiments,
            },
            results: self.results,
        }
    }
}
