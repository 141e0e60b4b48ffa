//! Simulation report types with JSON persistence and regression detection.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AdaptiveConfig, TestPurpose};
use crate::simulation::SessionSummary;
use crate::statistics::SimulationStats;

/// A complete simulation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the item bank.
    pub item_bank: ItemBankSummary,
    pub purpose: TestPurpose,
    /// Resolved configuration the sessions ran with.
    pub config: AdaptiveConfig,
    /// Individual session outcomes.
    pub sessions: Vec<SessionSummary>,
    /// Sessions that ended in an error.
    #[serde(default)]
    pub failed_sessions: usize,
    /// Aggregate statistics.
    pub stats: SimulationStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of an item bank (without the items).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemBankSummary {
    pub id: String,
    pub name: String,
    pub item_count: usize,
}

/// Whether a metric improves by going down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Better {
    Lower,
    Higher,
}

/// Metrics compared between runs, keyed by display name.
fn metrics(stats: &SimulationStats) -> BTreeMap<String, (f64, Better)> {
    let mut m = BTreeMap::new();
    m.insert("rmse".to_string(), (stats.rmse, Better::Lower));
    m.insert("abs_bias".to_string(), (stats.bias.abs(), Better::Lower));
    m.insert(
        "mean_absolute_error".to_string(),
        (stats.mean_absolute_error, Better::Lower),
    );
    m.insert(
        "mean_test_length".to_string(),
        (stats.mean_test_length, Better::Lower),
    );
    m.insert("mean_final_sem".to_string(), (stats.mean_final_sem, Better::Lower));
    m.insert(
        "max_exposure_rate".to_string(),
        (stats.max_exposure_rate, Better::Lower),
    );
    for (tier, t) in &stats.per_tier {
        m.insert(format!("accuracy_{tier}"), (t.accuracy, Better::Higher));
    }
    m
}

impl SimulationReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SimulationReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline to detect regressions.
    ///
    /// `threshold` is a relative change (0.05 = 5%); metrics whose baseline
    /// is zero are compared by absolute difference instead.
    pub fn compare(&self, baseline: &SimulationReport, threshold: f64) -> RegressionReport {
        let baseline_metrics = metrics(&baseline.stats);
        let current_metrics = metrics(&self.stats);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_metrics = 0usize;

        for (name, &(current, better)) in &current_metrics {
            let Some(&(baseline_val, _)) = baseline_metrics.get(name) else {
                new_metrics += 1;
                continue;
            };
            let delta = current - baseline_val;
            let relative = if baseline_val.abs() > f64::EPSILON {
                delta / baseline_val.abs()
            } else {
                delta
            };
            let change = MetricChange {
                metric: name.clone(),
                baseline: baseline_val,
                current,
                delta,
                relative,
            };
            let worse = match better {
                Better::Lower => relative > threshold,
                Better::Higher => relative < -threshold,
            };
            let improved = match better {
                Better::Lower => relative < -threshold,
                Better::Higher => relative > threshold,
            };
            if worse {
                regressions.push(change);
            } else if improved {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_metrics = baseline_metrics
            .keys()
            .filter(|k| !current_metrics.contains_key(*k))
            .count();

        RegressionReport {
            baseline_id: baseline.id,
            current_id: self.id,
            regressions,
            improvements,
            unchanged,
            new_metrics,
            removed_metrics,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    pub baseline_id: Uuid,
    pub current_id: Uuid,
    /// Metrics that got worse.
    pub regressions: Vec<MetricChange>,
    /// Metrics that got better.
    pub improvements: Vec<MetricChange>,
    /// Metrics with no significant change.
    pub unchanged: usize,
    /// Metrics in current but not baseline.
    pub new_metrics: usize,
    /// Metrics in baseline but not current.
    pub removed_metrics: usize,
}

/// A metric that moved past the threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricChange {
    pub metric: String,
    pub baseline: f64,
    pub current: f64,
    pub delta: f64,
    /// `delta` relative to the baseline value.
    pub relative: f64,
}

impl RegressionReport {
    /// Format the regression report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        let table = |md: &mut String, title: &str, rows: &[MetricChange]| {
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Metric | Baseline | Current | Delta | Change |\n");
            md.push_str("|--------|----------|---------|-------|--------|\n");
            for r in rows {
                md.push_str(&format!(
                    "| {} | {:.4} | {:.4} | {:+.4} | {:+.1}% |\n",
                    r.metric,
                    r.baseline,
                    r.current,
                    r.delta,
                    r.relative * 100.0
                ));
            }
            md.push('\n');
        };

        if !self.regressions.is_empty() {
            table(&mut md, "Regressions", &self.regressions);
        }
        if !self.improvements.is_empty() {
            table(&mut md, "Improvements", &self.improvements);
        }

        md
    }

    /// Returns true if there are any regressions.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::TierStats;

    fn make_stats(rmse: f64, length: f64, c3_accuracy: Option<f64>) -> SimulationStats {
        let mut per_tier = BTreeMap::new();
        if let Some(accuracy) = c3_accuracy {
            per_tier.insert(
                "C3".to_string(),
                TierStats {
                    sessions: 10,
                    accuracy,
                    mean_absolute_error: 0.2,
                },
            );
        }
        SimulationStats {
            sessions: 10,
            scored_sessions: 10,
            bias: 0.05,
            rmse,
            mean_absolute_error: 0.2,
            correlation: Some(0.9),
            mean_test_length: length,
            mean_final_sem: 0.3,
            stop_reasons: BTreeMap::new(),
            max_exposure_rate: 0.4,
            unused_items: 0,
            per_tier,
        }
    }

    fn make_report(stats: SimulationStats) -> SimulationReport {
        SimulationReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            item_bank: ItemBankSummary {
                id: "test".into(),
                name: "Test".into(),
                item_count: 40,
            },
            purpose: TestPurpose::Diagnostic,
            config: AdaptiveConfig::default(),
            sessions: vec![],
            failed_sessions: 0,
            stats,
            duration_ms: 0,
        }
    }

    #[test]
    fn compare_identical_reports() {
        let baseline = make_report(make_stats(0.3, 15.0, Some(0.8)));
        let current = make_report(make_stats(0.3, 15.0, Some(0.8)));

        let report = current.compare(&baseline, 0.05);
        assert!(report.regressions.is_empty());
        assert!(report.improvements.is_empty());
        assert_eq!(report.unchanged, 7);
    }

    #[test]
    fn compare_with_regression_and_improvement() {
        let baseline = make_report(make_stats(0.3, 15.0, Some(0.8)));
        let current = make_report(make_stats(0.4, 12.0, Some(0.6)));

        let report = current.compare(&baseline, 0.05);
        let regressed: Vec<_> = report.regressions.iter().map(|r| r.metric.as_str()).collect();
        assert!(regressed.contains(&"rmse"));
        assert!(regressed.contains(&"accuracy_C3"));
        assert_eq!(report.improvements.len(), 1);
        assert_eq!(report.improvements[0].metric, "mean_test_length");
        assert!(report.has_regressions());
    }

    #[test]
    fn small_changes_are_noise() {
        let baseline = make_report(make_stats(0.300, 15.0, None));
        let current = make_report(make_stats(0.305, 15.2, None));
        assert!(!current.compare(&baseline, 0.05).has_regressions());
    }

    #[test]
    fn compare_with_new_and_removed_tiers() {
        let baseline = make_report(make_stats(0.3, 15.0, Some(0.8)));
        let current = make_report(make_stats(0.3, 15.0, None));
        let report = current.compare(&baseline, 0.05);
        assert_eq!(report.removed_metrics, 1);

        let report = baseline.compare(&current, 0.05);
        assert_eq!(report.new_metrics, 1);
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report(make_stats(0.3, 15.0, Some(0.8)));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = SimulationReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.item_bank.id, "test");
        assert_eq!(loaded.stats.per_tier.len(), 1);
        assert!((loaded.stats.rmse - 0.3).abs() < 1e-12);
    }

    #[test]
    fn markdown_output() {
        let baseline = make_report(make_stats(0.3, 15.0, Some(0.8)));
        let current = make_report(make_stats(0.5, 15.0, Some(0.8)));

        let md = current.compare(&baseline, 0.05).to_markdown();
        assert!(md.contains("Regressions"));
        assert!(md.contains("rmse"));
        assert!(!md.contains("Improvements"));
    }
}
