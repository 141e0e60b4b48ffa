//! Tier classification and the active-tier progression state machine.
//!
//! Two views are kept side by side. The *estimated* tier is a direct
//! mapping of theta. The *active* tier filters candidate items and only
//! moves one step at a time, after enough evidence, and only in the
//! direction the most recent answer allows: a wrong answer can never
//! promote, a right answer can never demote.

use serde::{Deserialize, Serialize};

use crate::config::TierSettings;
use crate::model::Tier;

/// Map theta onto a tier using the configured cut points (no hysteresis).
pub fn classify(theta: f64, settings: &TierSettings) -> Tier {
    let idx = settings
        .cut_points
        .iter()
        .take_while(|&&cut| theta >= cut)
        .count();
    Tier::from_index(idx)
}

/// Theta range `[lo, hi)` covered by a tier. The outer tiers are unbounded.
pub fn theta_range(tier: Tier, settings: &TierSettings) -> (f64, f64) {
    let cuts = settings.cut_points;
    match tier {
        Tier::C1 => (f64::NEG_INFINITY, cuts[0]),
        Tier::C2 => (cuts[0], cuts[1]),
        Tier::C3 => (cuts[1], cuts[2]),
        Tier::C4 => (cuts[2], f64::INFINITY),
    }
}

/// Outcome of one progression evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierTransition {
    Promoted { from: Tier, to: Tier },
    Demoted { from: Tier, to: Tier },
    Held { reason: HoldReason },
}

/// Why the active tier did not move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldReason {
    /// Not enough answers yet.
    InsufficientEvidence,
    /// A tier change happened too recently.
    Cooldown,
    /// The window did not reach the threshold.
    BelowThreshold,
    /// Already at the top or bottom tier.
    AtBoundary,
}

impl TierTransition {
    /// The tier after this transition.
    pub fn resulting_tier(&self, current: Tier) -> Tier {
        match self {
            TierTransition::Promoted { to, .. } | TierTransition::Demoted { to, .. } => *to,
            TierTransition::Held { .. } => current,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, TierTransition::Held { .. })
    }
}

/// Inputs to one evaluation of the active tier.
#[derive(Debug, Clone, Copy)]
pub struct ProgressionInput<'a> {
    pub active: Tier,
    /// Full response history, oldest first.
    pub responses: &'a [bool],
    /// Answer count at which the active tier last changed.
    pub last_change_at: Option<usize>,
    /// Answers required before any change (already halved for aggressive configs).
    pub min_questions: usize,
}

fn correct_in_window(responses: &[bool], window: usize) -> usize {
    let start = responses.len().saturating_sub(window);
    responses[start..].iter().filter(|&&c| c).count()
}

/// Decide whether the active tier moves this cycle.
pub fn evaluate_progression(
    input: ProgressionInput<'_>,
    settings: &TierSettings,
) -> TierTransition {
    let answered = input.responses.len();
    let hold = |reason| TierTransition::Held { reason };

    if answered < input.min_questions {
        return hold(HoldReason::InsufficientEvidence);
    }
    if let Some(at) = input.last_change_at {
        if answered < at + settings.change_cooldown {
            return hold(HoldReason::Cooldown);
        }
    }
    let Some(&last_correct) = input.responses.last() else {
        return hold(HoldReason::InsufficientEvidence);
    };

    if last_correct {
        let correct = correct_in_window(input.responses, settings.promotion_window);
        if correct < settings.promotion_threshold {
            return hold(HoldReason::BelowThreshold);
        }
        match input.active.promoted() {
            Some(to) => TierTransition::Promoted {
                from: input.active,
                to,
            },
            None => hold(HoldReason::AtBoundary),
        }
    } else {
        let correct = correct_in_window(input.responses, settings.demotion_window);
        if correct > settings.demotion_threshold {
            return hold(HoldReason::BelowThreshold);
        }
        match input.active.demoted() {
            Some(to) => TierTransition::Demoted {
                from: input.active,
                to,
            },
            None => hold(HoldReason::AtBoundary),
        }
    }
}
