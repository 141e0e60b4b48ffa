//! The `adaptest compare` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::report::SimulationReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = SimulationReport::load_json(&baseline_path)?;
    let current = SimulationReport::load_json(&current_path)?;

    if baseline.purpose != current.purpose {
        eprintln!(
            "Warning: comparing different purposes ({} vs {})",
            baseline.purpose, current.purpose
        );
    }

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );

            if !report.regressions.is_empty() {
                println!("\nRegressions:");
                for r in &report.regressions {
                    println!(
                        "  {} {:.4} -> {:.4} ({:+.1}%)",
                        r.metric,
                        r.baseline,
                        r.current,
                        r.relative * 100.0
                    );
                }
            }

            if !report.improvements.is_empty() {
                println!("\nImprovements:");
                for i in &report.improvements {
                    println!(
                        "  {} {:.4} -> {:.4} ({:+.1}%)",
                        i.metric,
                        i.baseline,
                        i.current,
                        i.relative * 100.0
                    );
                }
            }

            if report.new_metrics > 0 {
                println!("\n{} new metric(s)", report.new_metrics);
            }
            if report.removed_metrics > 0 {
                println!("{} removed metric(s)", report.removed_metrics);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
