use agentbench_core::NameRegistry;
use agentbench_export::{Exporter, ReportTotals, write_report};
use anyhow::Result;
use serde_json::json;

use crate::ExportArgs;
use crate::output::{print_json, warn};

pub(crate) fn run_export(args: ExportArgs, json_mode: bool) -> Result<()> {
    let mut registry = NameRegistry::builtin();
    if let Some(path) = &args.names {
        registry.load_overlay(path)?;
    }

    let exporter = Exporter::new(&args.results_dir, &args.config_dir, registry);
    let experiments = if args.experiments.is_empty() {
        exporter.discover()?
    } else {
        args.experiments.clone()
    };

    if !json_mode {
        println!("Exporting from experiments: {}\n", experiments.join(", "));
    }

    let (report, skipped) = exporter.build_report(&experiments);
    for reason in &skipped {
        warn(&reason.to_string());
    }

    write_report(&args.output, &report)?;
    let totals = ReportTotals::tally(&report);

    if json_mode {
        print_json(&json!({
            "output": args.output,
            "experiments": report.metadata.experiments.len(),
            "skipped": skipped.len(),
            "totalResults": totals.total_results,
            "totalSuccess": totals.total_success,
            "totalFailed": totals.total_failed(),
        }))?;
    } else {
        println!("{}", "-".repeat(60));
        println!("Exported to: {}", args.output.display());
        println!(
            "Total: {} | Pass: {} | Fail: {}",
            totals.total_results,
            totals.total_success,
            totals.total_failed()
        );
        println!("{}", "-".repeat(60));
    }
    Ok(())
}
