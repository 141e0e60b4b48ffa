//! Recovery and efficiency statistics over simulated sessions.
//!
//! Error metrics (bias, RMSE, MAE, correlation) use only sessions whose
//! examinee has a known true theta. Length, precision, stop reasons and
//! exposure use every completed session.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::TierSettings;
use crate::model::Tier;
use crate::simulation::SessionSummary;
use crate::tier::classify;

/// Aggregate statistics for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub sessions: usize,
    /// Sessions with a known true theta.
    pub scored_sessions: usize,
    /// Mean of `final - true`.
    pub bias: f64,
    pub rmse: f64,
    pub mean_absolute_error: f64,
    /// Pearson correlation of true and final theta, if defined.
    pub correlation: Option<f64>,
    pub mean_test_length: f64,
    pub mean_final_sem: f64,
    /// Count per stop reason.
    pub stop_reasons: BTreeMap<String, usize>,
    /// Largest share of sessions that saw any single item.
    pub max_exposure_rate: f64,
    /// Items nobody was asked.
    pub unused_items: usize,
    /// Classification accuracy grouped by the true tier.
    pub per_tier: BTreeMap<String, TierStats>,
}

/// Statistics for examinees whose true theta falls in one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    pub sessions: usize,
    /// Share of sessions whose final theta lands in the true tier.
    pub accuracy: f64,
    pub mean_absolute_error: f64,
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation, `None` when either side has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let (mx, my) = (mean(xs), mean(ys));
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }
    if vx <= 0.0 || vy <= 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

/// Compute statistics from completed sessions.
pub fn compute_simulation_stats(
    sessions: &[SessionSummary],
    item_count: usize,
    tiers: &TierSettings,
) -> SimulationStats {
    let n = sessions.len();

    let pairs: Vec<(f64, f64)> = sessions
        .iter()
        .filter_map(|s| s.true_theta.map(|t| (t, s.final_theta)))
        .collect();
    let errors: Vec<f64> = pairs.iter().map(|(t, e)| e - t).collect();
    let bias = mean(&errors);
    let rmse = mean(&errors.iter().map(|e| e * e).collect::<Vec<_>>()).sqrt();
    let mae = mean(&errors.iter().map(|e| e.abs()).collect::<Vec<_>>());
    let (truths, estimates): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();

    let lengths: Vec<f64> = sessions.iter().map(|s| s.questions_answered as f64).collect();
    let sems: Vec<f64> = sessions.iter().map(|s| s.final_sem).collect();

    let mut stop_reasons = BTreeMap::new();
    for s in sessions {
        let key = s
            .stop_reason
            .map(|r| r.to_string())
            .unwrap_or_else(|| "none".to_string());
        *stop_reasons.entry(key).or_insert(0) += 1;
    }

    // An item counts once per session however it was reached.
    let mut exposure: HashMap<&str, usize> = HashMap::new();
    for s in sessions {
        let seen: HashSet<&str> = s.items.iter().map(String::as_str).collect();
        for id in seen {
            *exposure.entry(id).or_insert(0) += 1;
        }
    }
    let max_exposure_rate = if n == 0 {
        0.0
    } else {
        exposure.values().copied().max().unwrap_or(0) as f64 / n as f64
    };
    let unused_items = item_count.saturating_sub(exposure.len());

    let mut grouped: BTreeMap<Tier, Vec<(f64, f64)>> = BTreeMap::new();
    for &(truth, estimate) in &pairs {
        grouped
            .entry(classify(truth, tiers))
            .or_default()
            .push((truth, estimate));
    }
    let per_tier = grouped
        .into_iter()
        .map(|(tier, group)| {
            let hits = group
                .iter()
                .filter(|(_, e)| classify(*e, tiers) == tier)
                .count();
            let abs: Vec<f64> = group.iter().map(|(t, e)| (e - t).abs()).collect();
            (
                tier.to_string(),
                TierStats {
                    sessions: group.len(),
                    accuracy: hits as f64 / group.len() as f64,
                    mean_absolute_error: mean(&abs),
                },
            )
        })
        .collect();

    SimulationStats {
        sessions: n,
        scored_sessions: pairs.len(),
        bias,
        rmse,
        mean_absolute_error: mae,
        correlation: pearson(&truths, &estimates),
        mean_test_length: mean(&lengths),
        mean_final_sem: mean(&sems),
        stop_reasons,
        max_exposure_rate,
        unused_items,
        per_tier,
    }
}
