//! Next-item selection.
//!
//! Candidates are narrowed step by step (tier, uniqueness, difficulty
//! monotonicity), each step relaxing instead of emptying the pool where it
//! can, then scored by information at an *anticipated* theta weighted by
//! content, exposure and progression factors. The only step that can end
//! with nothing is uniqueness: items already asked are never offered again.

use serde::{Deserialize, Serialize};

use crate::config::{AdaptiveConfig, TierSettings};
use crate::irt::{information, IrtCache};
use crate::model::{ItemParameters, Tier};
use crate::session::SessionState;
use crate::tier::{classify, theta_range};

/// Two scores closer than this are treated as tied.
const SCORE_EPSILON: f64 = 1e-12;

/// A filtering step that had to be loosened to keep candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relaxation {
    /// Nothing in the anticipated tier; used the active tier.
    ActiveTierFallback,
    /// Nothing in either tier; used every unasked item.
    UnfilteredPool,
    /// Nothing at or above the last difficulty; allowed a small margin below.
    DifficultyMargin,
    /// Monotonicity dropped entirely.
    DifficultyDropped,
}

/// The chosen item and how it was chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub item: ItemParameters,
    pub score: f64,
    /// Information of the item at the anticipated theta.
    pub information: f64,
    pub anticipated_theta: f64,
    /// Tier the candidates were filtered to.
    pub target_tier: Tier,
    /// Filters that were loosened, in order.
    pub relaxations: Vec<Relaxation>,
    /// Unasked items that were available before filtering.
    pub available: usize,
}

/// Forward-looking theta used only for scoring.
///
/// Shifts theta by the direction of the last few responses and keeps the
/// result within one tier of the current one.
pub fn anticipated_theta(theta: f64, responses: &[bool], config: &AdaptiveConfig) -> f64 {
    let sel = &config.selector;
    let k = sel.anticipation_lookback.min(responses.len());
    if k == 0 {
        return theta;
    }
    let recent = &responses[responses.len() - k..];
    let correct = recent.iter().filter(|&&c| c).count();

    let full = sel.max_anticipation_change * config.anticipation_multiplier;
    let partial = sel.max_anticipation_change * sel.mixed_anticipation_factor;
    let shift = if correct == k {
        full
    } else if correct == 0 {
        -full
    } else if 2 * correct > k {
        partial
    } else if 2 * correct < k {
        -partial
    } else {
        0.0
    };

    let est = &config.estimator;
    let anticipated = (theta + shift).clamp(est.theta_min, est.theta_max);

    let tiers = &config.tiers;
    let current = classify(theta, tiers);
    let target = classify(anticipated, tiers);
    let margin = sel.tier_edge_margin;

    if target.index() > current.index() + 1 {
        let (_, hi) = theta_range(Tier::from_index(current.index() + 1), tiers);
        hi - margin
    } else if target.index() + 1 < current.index() {
        let (lo, _) = theta_range(Tier::from_index(current.index() - 1), tiers);
        lo + margin
    } else {
        anticipated
    }
}

/// Multiplier for a topic already used `uses` times in this session.
pub fn content_penalty(uses: u32, config: &AdaptiveConfig) -> f64 {
    if !config.enable_content_balancing {
        return 1.0;
    }
    let sel = &config.selector;
    sel.content_decay.powi(uses.min(sel.content_penalty_cap) as i32)
}

/// Multiplier for an item already administered `exposures` times.
pub fn exposure_penalty(exposures: u32, config: &AdaptiveConfig) -> f64 {
    let sel = &config.selector;
    sel.exposure_decay.powi(exposures.min(sel.exposure_penalty_cap) as i32)
}

/// Items labelled `tier`, preferring those whose parameters sit inside the
/// tier's band. Mislabelled items are only used when nothing else carries the label.
fn tier_members<'a>(
    candidates: &[&'a ItemParameters],
    tier: Tier,
    tiers: &TierSettings,
) -> Vec<&'a ItemParameters> {
    let band = &tiers.bands[tier.index()];
    let labelled: Vec<_> = candidates.iter().copied().filter(|i| i.tier == tier).collect();
    let in_band: Vec<_> = labelled
        .iter()
        .copied()
        .filter(|i| {
            band.contains_difficulty(i.difficulty)
                && band.contains_discrimination(i.discrimination)
        })
        .collect();
    if in_band.is_empty() {
        labelled
    } else {
        in_band
    }
}

fn tier_filter<'a>(
    candidates: &[&'a ItemParameters],
    target: Tier,
    active: Tier,
    tiers: &TierSettings,
    relaxations: &mut Vec<Relaxation>,
) -> Vec<&'a ItemParameters> {
    let in_target = tier_members(candidates, target, tiers);
    if !in_target.is_empty() {
        return in_target;
    }
    if active != target {
        let in_active = tier_members(candidates, active, tiers);
        if !in_active.is_empty() {
            relaxations.push(Relaxation::ActiveTierFallback);
            return in_active;
        }
    }
    relaxations.push(Relaxation::UnfilteredPool);
    candidates.to_vec()
}

fn monotonic_filter<'a>(
    candidates: Vec<&'a ItemParameters>,
    last_difficulty: f64,
    margin: f64,
    relaxations: &mut Vec<Relaxation>,
) -> Vec<&'a ItemParameters> {
    let strict: Vec<_> = candidates
        .iter()
        .copied()
        .filter(|i| i.difficulty >= last_difficulty)
        .collect();
    if !strict.is_empty() {
        return strict;
    }
    let relaxed: Vec<_> = candidates
        .iter()
        .copied()
        .filter(|i| i.difficulty >= last_difficulty - margin)
        .collect();
    if !relaxed.is_empty() {
        relaxations.push(Relaxation::DifficultyMargin);
        return relaxed;
    }
    relaxations.push(Relaxation::DifficultyDropped);
    candidates
}

/// Choose the next item for a session, without mutating it.
///
/// Returns `None` when every item in `pool` has already been asked.
pub fn select_item(
    theta: f64,
    pool: &[ItemParameters],
    state: &SessionState,
    config: &AdaptiveConfig,
    cache: Option<&IrtCache>,
) -> Option<Selection> {
    let history = state.response_history();
    let anticipated = anticipated_theta(theta, &history, config);
    let target = classify(anticipated, &config.tiers);
    let mut relaxations = Vec::new();

    let unasked: Vec<&ItemParameters> = pool.iter().filter(|i| !state.has_asked(&i.id)).collect();
    if unasked.is_empty() {
        tracing::debug!(pool = pool.len(), "no unasked items left");
        return None;
    }
    let available = unasked.len();

    let mut candidates = tier_filter(
        &unasked,
        target,
        state.active_tier,
        &config.tiers,
        &mut relaxations,
    );

    let after_correct = state.last_outcome() == Some(true);
    let last_difficulty = state.last_item_difficulty.filter(|_| after_correct);
    if let Some(last) = last_difficulty {
        candidates = monotonic_filter(
            candidates,
            last,
            config.selector.difficulty_relaxation,
            &mut relaxations,
        );
        // Widening the tier may find compliant items the tier filter dropped.
        if relaxations.contains(&Relaxation::DifficultyDropped)
            || relaxations.contains(&Relaxation::DifficultyMargin)
        {
            let compliant: Vec<_> = unasked
                .iter()
                .copied()
                .filter(|i| i.difficulty >= last)
                .collect();
            if !compliant.is_empty() {
                relaxations.retain(|r| {
                    !matches!(r, Relaxation::DifficultyDropped | Relaxation::DifficultyMargin)
                });
                relaxations.push(Relaxation::UnfilteredPool);
                candidates = compliant;
            }
        }
    }

    let info_at = |item: &ItemParameters| match cache {
        Some(cache) => cache.information(anticipated, &item.irt()),
        None => information(
            anticipated,
            item.difficulty,
            item.discrimination,
            item.guessing,
        ),
    };

    let mut best: Option<(f64, f64, &ItemParameters)> = None;
    for item in candidates {
        let info = info_at(item);
        let uses = state.content_usage_counts.get(&item.topic).copied().unwrap_or(0);
        let exposures = state.item_exposure_counts.get(&item.id).copied().unwrap_or(0);
        let bonus = match last_difficulty {
            Some(last) if item.difficulty > last => config.selector.progression_bonus,
            _ => 1.0,
        };
        let score =
            info * content_penalty(uses, config) * exposure_penalty(exposures, config) * bonus;

        let replace = match best {
            None => true,
            Some((best_score, _, current)) => {
                if score > best_score + SCORE_EPSILON {
                    true
                } else if score + SCORE_EPSILON < best_score {
                    false
                } else {
                    let d_new = (item.difficulty - anticipated).abs();
                    let d_cur = (current.difficulty - anticipated).abs();
                    d_new < d_cur || (d_new == d_cur && item.id < current.id)
                }
            }
        };
        if replace {
            best = Some((score, info, item));
        }
    }

    let (score, info, item) = best?;
    tracing::debug!(
        item = %item.id,
        score,
        anticipated,
        %target,
        ?relaxations,
        "item selected"
    );

    Some(Selection {
        item: item.clone(),
        score,
        information: info,
        anticipated_theta: anticipated,
        target_tier: target,
        relaxations,
        available,
    })
}

/// Apply the side effects of accepting a selection to the session.
pub fn record_selection(state: &mut SessionState, item: &ItemParameters) {
    *state
        .content_usage_counts
        .entry(item.topic.clone())
        .or_insert(0) += 1;
    *state.item_exposure_counts.entry(item.id.clone()).or_insert(0) += 1;
    state.last_item_difficulty = Some(item.difficulty);
    state.asked_item_ids.insert(item.id.clone());
    state.pending_item = Some(item.clone());
}
