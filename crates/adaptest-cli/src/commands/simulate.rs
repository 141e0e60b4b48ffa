//! The `adaptest simulate` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use adaptest_core::config::{load_config_from, TestPurpose};
use adaptest_core::engine::AdaptiveEngine;
use adaptest_core::irt::IrtCache;
use adaptest_core::model::CompetenceLevel;
use adaptest_core::parser;
use adaptest_core::report::SimulationReport;
use adaptest_core::simulation::{examinee_grid, SessionSummary, SimulationConfig, Simulator};
use adaptest_core::traits::ProgressReporter;

/// Arguments for `adaptest simulate`.
pub struct SimulateArgs {
    pub item_bank: PathBuf,
    pub purpose: Option<String>,
    pub examinees: usize,
    pub theta_min: f64,
    pub theta_max: f64,
    pub start: String,
    pub seed: u64,
    pub parallelism: usize,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
}

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_session_start(&self, _examinee: &str) {}

    fn on_session_complete(&self, summary: &SessionSummary) {
        let truth = summary
            .true_theta
            .map(|t| format!("{t:+.2}"))
            .unwrap_or_else(|| "?".to_string());
        let reason = summary
            .stop_reason
            .map(|r| r.to_string())
            .unwrap_or_else(|| "none".to_string());
        tracing::debug!(
            "  Done: {} true {} est {:+.2} sem {:.3} after {} items [{}]",
            summary.examinee,
            truth,
            summary.final_theta,
            summary.final_sem,
            summary.questions_answered,
            reason,
        );
    }

    fn on_session_error(&self, examinee: &str, error: &str) {
        eprintln!("  ERROR: {examinee}: {error}");
    }

    fn on_run_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} sessions finished, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(args: SimulateArgs) -> Result<()> {
    // Validate inputs
    anyhow::ensure!(args.parallelism >= 1, "parallelism must be at least 1");
    anyhow::ensure!(args.examinees >= 1, "examinees must be at least 1");
    anyhow::ensure!(
        args.theta_min < args.theta_max,
        "theta-min ({}) must be below theta-max ({})",
        args.theta_min,
        args.theta_max
    );

    // Load config
    let config = load_config_from(args.config.as_deref())?;
    let purpose = match &args.purpose {
        Some(p) => p.parse::<TestPurpose>().map_err(|e| anyhow::anyhow!(e))?,
        None => config.default_purpose,
    };
    let adaptive = config.resolve(purpose)?;
    let starting_level: CompetenceLevel = args
        .start
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    // Load item bank
    let bank = parser::load_item_banks(&args.item_bank)?;
    anyhow::ensure!(
        !bank.items.is_empty(),
        "item bank '{}' has no items",
        bank.id
    );
    let warnings = parser::validate_item_bank(&bank, &adaptive.tiers);
    if !warnings.is_empty() {
        eprintln!(
            "Warning: item bank has {} validation warning(s); run `adaptest validate` for details.",
            warnings.len()
        );
    }

    let cache = Arc::new(IrtCache::new(config.cache_capacity));
    let engine = Arc::new(AdaptiveEngine::with_cache(adaptive, Arc::clone(&cache))?);

    eprintln!(
        "adaptest v{}: simulating {} examinees ({purpose}) on {} items",
        env!("CARGO_PKG_VERSION"),
        args.examinees,
        bank.items.len()
    );

    let simulator = Simulator::new(
        engine,
        Arc::new(bank),
        SimulationConfig {
            parallelism: args.parallelism,
            starting_level,
        },
    );
    let examinees = examinee_grid(args.examinees, args.theta_min, args.theta_max, args.seed);
    let report = simulator.run(examinees, &ConsoleReporter).await?;

    print_summary(&report);

    let stats = cache.stats();
    tracing::debug!(
        hits = stats.hits,
        misses = stats.misses,
        entries = stats.entries,
        "irt cache"
    );

    // Save output
    std::fs::create_dir_all(&args.output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = args.output.join(format!("simulation-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn print_summary(report: &SimulationReport) {
    use comfy_table::{Cell, Table};

    let stats = &report.stats;

    let mut table = Table::new();
    table.set_header(vec![
        "Purpose",
        "Sessions",
        "Bias",
        "RMSE",
        "MAE",
        "r",
        "Mean Length",
        "Mean SEM",
        "Max Exposure",
    ]);
    table.add_row(vec![
        Cell::new(report.purpose),
        Cell::new(stats.sessions),
        Cell::new(format!("{:+.3}", stats.bias)),
        Cell::new(format!("{:.3}", stats.rmse)),
        Cell::new(format!("{:.3}", stats.mean_absolute_error)),
        Cell::new(
            stats
                .correlation
                .map(|r| format!("{r:.3}"))
                .unwrap_or_else(|| "-".to_string()),
        ),
        Cell::new(format!("{:.1}", stats.mean_test_length)),
        Cell::new(format!("{:.3}", stats.mean_final_sem)),
        Cell::new(format!("{:.1}%", stats.max_exposure_rate * 100.0)),
    ]);
    eprintln!("\n{table}");

    let mut tiers = Table::new();
    tiers.set_header(vec!["True Tier", "Sessions", "Accuracy", "MAE"]);
    for (tier, t) in &stats.per_tier {
        tiers.add_row(vec![
            Cell::new(tier),
            Cell::new(t.sessions),
            Cell::new(format!("{:.1}%", t.accuracy * 100.0)),
            Cell::new(format!("{:.3}", t.mean_absolute_error)),
        ]);
    }
    eprintln!("{tiers}");

    let mut reasons = Table::new();
    reasons.set_header(vec!["Stop Reason", "Sessions"]);
    for (reason, count) in &stats.stop_reasons {
        reasons.add_row(vec![Cell::new(reason), Cell::new(count)]);
    }
    eprintln!("{reasons}");

    if stats.unused_items > 0 {
        eprintln!("{} item(s) were never administered.", stats.unused_items);
    }
}
