use agentbench_core::{
    AgentResult, EvalOutcome, EvalSummary, SUMMARY_FILE, canonicalize_timestamp, parse_instant,
};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::child_names;

/// Accepted outcomes for one experiment: exactly one record per eval id.
#[derive(Debug, Clone)]
pub struct ExperimentRuns {
    pub name: String,
    /// Canonical timestamp of the newest execution that contributed at
    /// least one accepted record.
    pub timestamp: String,
    pub records: Vec<AgentResult>,
}

#[derive(Debug)]
pub enum CollectOutcome {
    /// No directory for this experiment under the results root.
    Missing,
    /// Directory exists but the full traversal accepted zero records.
    Empty,
    Ready(ExperimentRuns),
}

/// Resolve one accepted record per eval id for an experiment.
///
/// Executions are visited newest-first and an eval id is marked resolved
/// only when a record is accepted. Rejections (unreadable, unparsable, or
/// explicitly invalid records) leave the id unresolved, so an older
/// execution's valid record can still win. "First record seen" without the
/// validity gate would pin invalid newest attempts; the gate is the point.
pub fn collect_experiment(results_dir: &Path, name: &str) -> CollectOutcome {
    let experiment_dir = results_dir.join(name);
    if !experiment_dir.is_dir() {
        return CollectOutcome::Missing;
    }

    let mut executions: Vec<(String, Option<chrono::DateTime<chrono::Utc>>)> =
        child_names(&experiment_dir)
            .into_iter()
            .map(|raw| {
                let instant = parse_instant(&raw);
                (raw, instant)
            })
            .collect();
    // Newest first. Executions whose timestamp does not parse order last,
    // so anything with a real timestamp shadows them.
    executions.sort_by(|a, b| b.1.cmp(&a.1));

    let mut resolved: HashSet<String> = HashSet::new();
    let mut records: Vec<AgentResult> = Vec::new();
    let mut newest_contributing: Option<String> = None;

    for (execution, _) in &executions {
        let canonical = canonicalize_timestamp(execution);
        let run_dir = experiment_dir.join(execution);
        for eval_id in child_names(&run_dir) {
            if resolved.contains(&eval_id) {
                continue;
            }
            let Some(summary) = read_summary(&run_dir.join(&eval_id).join(SUMMARY_FILE)) else {
                continue;
            };
            if !summary.is_valid() {
                continue;
            }
            records.push(AgentResult {
                eval_path: eval_id.clone(),
                result: EvalOutcome {
                    success: summary.passed_runs > 0,
                    duration: summary.mean_duration * 1000.0,
                    eval_path: eval_id.clone(),
                    timestamp: canonical.clone(),
                },
            });
            resolved.insert(eval_id);
            newest_contributing.get_or_insert_with(|| canonical.clone());
        }
    }

    match newest_contributing {
        Some(timestamp) => CollectOutcome::Ready(ExperimentRuns {
            name: name.to_string(),
            timestamp,
            records,
        }),
        None => CollectOutcome::Empty,
    }
}

/// A record that cannot be read or parsed is treated like an invalid one:
/// skipped without resolving its eval id.
fn read_summary(path: &Path) -> Option<EvalSummary> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use std::fs;
    use tempfile::TempDir;

    fn ready(results_dir: &Path, name: &str) -> ExperimentRuns {
        match collect_experiment(results_dir, name) {
            CollectOutcome::Ready(runs) => runs,
            other => panic!("expected accepted records, got {other:?}"),
        }
    }

    fn record<'a>(runs: &'a ExperimentRuns, eval: &str) -> &'a AgentResult {
        runs.records
            .iter()
            .find(|r| r.eval_path == eval)
            .unwrap_or_else(|| panic!("no record for {eval}"))
    }

    #[test]
    fn merges_executions_newest_valid_wins() {
        let root = TempDir::new().expect("root");
        // Scenario: eval-a recorded in both executions, eval-b only in the
        // older one.
        write_summary(
            root.path(),
            "demo",
            "2024-01-02T10-00-00.000Z",
            "eval-a",
            &summary(1, 1, 2.0),
        );
        write_summary(
            root.path(),
            "demo",
            "2024-01-01T10-00-00.000Z",
            "eval-a",
            &summary(1, 0, 3.0),
        );
        write_summary(
            root.path(),
            "demo",
            "2024-01-01T10-00-00.000Z",
            "eval-b",
            &summary(2, 2, 1.5),
        );

        let runs = ready(root.path(), "demo");
        assert_eq!(runs.records.len(), 2);
        assert_eq!(runs.timestamp, "2024-01-02T10:00:00.000Z");

        let a = record(&runs, "eval-a");
        assert!(a.result.success);
        assert_eq!(a.result.duration, 2000.0);
        assert_eq!(a.result.timestamp, "2024-01-02T10:00:00.000Z");

        let b = record(&runs, "eval-b");
        assert!(b.result.success);
        assert_eq!(b.result.duration, 1500.0);
        assert_eq!(b.result.timestamp, "2024-01-01T10:00:00.000Z");
    }

    #[test]
    fn invalid_newest_does_not_shadow_older_valid() {
        let root = TempDir::new().expect("root");
        write_summary(
            root.path(),
            "demo",
            "2024-01-02T10-00-00.000Z",
            "eval-a",
            &invalid_summary(1, 1, 9.0),
        );
        write_summary(
            root.path(),
            "demo",
            "2024-01-01T10-00-00.000Z",
            "eval-a",
            &summary(1, 1, 2.0),
        );

        let runs = ready(root.path(), "demo");
        assert_eq!(runs.records.len(), 1);
        let a = record(&runs, "eval-a");
        assert_eq!(a.result.duration, 2000.0);
        assert_eq!(a.result.timestamp, "2024-01-01T10:00:00.000Z");
        // Newest contributing execution, not newest execution overall.
        assert_eq!(runs.timestamp, "2024-01-01T10:00:00.000Z");
    }

    #[test]
    fn corrupt_newest_does_not_shadow_older_valid() {
        let root = TempDir::new().expect("root");
        write_summary(
            root.path(),
            "demo",
            "2024-01-02T10-00-00.000Z",
            "eval-a",
            "{{{ not json",
        );
        write_summary(
            root.path(),
            "demo",
            "2024-01-01T10-00-00.000Z",
            "eval-a",
            &summary(1, 0, 4.0),
        );

        let runs = ready(root.path(), "demo");
        let a = record(&runs, "eval-a");
        assert!(!a.result.success);
        assert_eq!(a.result.timestamp, "2024-01-01T10:00:00.000Z");
    }

    #[test]
    fn all_invalid_yields_empty() {
        let root = TempDir::new().expect("root");
        write_summary(
            root.path(),
            "ghost",
            "2024-01-01T10-00-00.000Z",
            "eval-a",
            &invalid_summary(1, 0, 1.0),
        );
        assert!(matches!(
            collect_experiment(root.path(), "ghost"),
            CollectOutcome::Empty
        ));
    }

    #[test]
    fn all_corrupt_yields_empty() {
        let root = TempDir::new().expect("root");
        write_summary(
            root.path(),
            "ghost",
            "2024-01-01T10-00-00.000Z",
            "eval-a",
            "not json at all",
        );
        assert!(matches!(
            collect_experiment(root.path(), "ghost"),
            CollectOutcome::Empty
        ));
    }

    #[test]
    fn missing_directory_is_reported_as_missing() {
        let root = TempDir::new().expect("root");
        assert!(matches!(
            collect_experiment(root.path(), "nope"),
            CollectOutcome::Missing
        ));
    }

    #[test]
    fn zero_passed_runs_is_an_accepted_failure() {
        let root = TempDir::new().expect("root");
        write_summary(
            root.path(),
            "demo",
            "2024-01-01T10-00-00.000Z",
            "eval-a",
            &summary(3, 0, 1.0),
        );
        let runs = ready(root.path(), "demo");
        let a = record(&runs, "eval-a");
        assert!(!a.result.success);
    }

    #[test]
    fn eval_id_resolved_at_most_once_across_many_executions() {
        let root = TempDir::new().expect("root");
        for day in 1..=5 {
            write_summary(
                root.path(),
                "demo",
                &format!("2024-01-0{day}T10-00-00.000Z"),
                "eval-a",
                &summary(1, day % 2, day as f64),
            );
        }
        let runs = ready(root.path(), "demo");
        assert_eq!(runs.records.len(), 1);
        // Day 5 is newest and valid, so it wins.
        assert_eq!(record(&runs, "eval-a").result.duration, 5000.0);
    }

    #[test]
    fn unparsable_execution_timestamps_order_last() {
        let root = TempDir::new().expect("root");
        write_summary(
            root.path(),
            "demo",
            "scratch-run",
            "eval-a",
            &summary(1, 0, 9.0),
        );
        write_summary(
            root.path(),
            "demo",
            "2024-01-01T10-00-00.000Z",
            "eval-a",
            &summary(1, 1, 2.0),
        );

        let runs = ready(root.path(), "demo");
        let a = record(&runs, "eval-a");
        assert_eq!(a.result.timestamp, "2024-01-01T10:00:00.000Z");

        // A directory that is not an execution still contributes when
        // nothing newer resolved the eval.
        fs::remove_dir_all(
            root.path()
                .join("demo")
                .join("2024-01-01T10-00-00.000Z"),
        )
        .expect("remove");
        let runs = ready(root.path(), "demo");
        assert_eq!(record(&runs, "eval-a").result.timestamp, "scratch-run");
    }
}
