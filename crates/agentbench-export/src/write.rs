use agentbench_core::{ExportReport, Result};
use anyhow::anyhow;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Aggregate pass/fail counts across every record in a report. Console
/// output only; never part of the persisted artifact.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub total_results: u64,
    pub total_success: u64,
}

impl ReportTotals {
    pub fn tally(report: &ExportReport) -> Self {
        let mut totals = Self {
            total_results: 0,
            total_success: 0,
        };
        for records in report.results.values() {
            for record in records {
                totals.total_results += 1;
                if record.result.success {
                    totals.total_success += 1;
                }
            }
        }
        totals
    }

    pub fn total_failed(&self) -> u64 {
        self.total_results - self.total_success
    }
}

/// Serialize the report as pretty JSON in a single write, replacing any
/// previous artifact. A write failure aborts the run.
pub fn write_report(path: &Path, report: &ExportReport) -> Result<()> {
    let body = serde_json::to_vec_pretty(report)?;
    fs::write(path, body)
        .map_err(|err| anyhow!("cannot write report {}: {err}", path.display()))?;
    Ok(())
}
