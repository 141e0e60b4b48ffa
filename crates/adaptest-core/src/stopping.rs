//! Stopping rules.
//!
//! Precedence: the minimum-question floor, then the precision target, then
//! the hard ceiling, then (when enabled) stability and streak signals. The
//! optional signals can only end a session early; they never run past the
//! ceiling or below the floor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AdaptiveConfig;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// SEM reached the target.
    Precision,
    /// The maximum number of questions was answered.
    MaxQuestions,
    /// Theta stopped moving.
    Stability,
    /// A long run of identical outcomes.
    Streak,
    /// Every recent answer had the same outcome.
    UniformResponses,
    /// The selector found nothing left to ask.
    NoItemsAvailable,
}

impl StopReason {
    pub const ALL: [StopReason; 6] = [
        StopReason::Precision,
        StopReason::MaxQuestions,
        StopReason::Stability,
        StopReason::Streak,
        StopReason::UniformResponses,
        StopReason::NoItemsAvailable,
    ];

    /// How strongly the reason indicates the estimate is settled.
    pub fn confidence(self) -> f64 {
        match self {
            StopReason::Precision => 0.95,
            StopReason::Stability => 0.9,
            StopReason::UniformResponses => 0.85,
            StopReason::Streak => 0.8,
            StopReason::MaxQuestions => 0.7,
            StopReason::NoItemsAvailable => 0.5,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Precision => "precision",
            StopReason::MaxQuestions => "max_questions",
            StopReason::Stability => "stability",
            StopReason::Streak => "streak",
            StopReason::UniformResponses => "uniform_responses",
            StopReason::NoItemsAvailable => "no_items_available",
        };
        write!(f, "{s}")
    }
}

/// Result of evaluating the stopping rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopDecision {
    pub stop: bool,
    pub reason: Option<StopReason>,
    /// 0 when continuing.
    pub confidence: f64,
}

impl StopDecision {
    pub fn proceed() -> Self {
        Self {
            stop: false,
            reason: None,
            confidence: 0.0,
        }
    }

    pub fn stop(reason: StopReason) -> Self {
        Self {
            stop: true,
            reason: Some(reason),
            confidence: reason.confidence(),
        }
    }
}

/// Snapshot the stopping rules look at.
#[derive(Debug, Clone, Copy)]
pub struct StopInput<'a> {
    pub sem: f64,
    pub questions_answered: usize,
    /// Outcomes, oldest first.
    pub responses: &'a [bool],
    /// Theta after every update, oldest first.
    pub theta_history: &'a [f64],
}

fn variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn longest_run(outcomes: &[bool]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for &o in outcomes {
        if previous == Some(o) {
            current += 1;
        } else {
            current = 1;
            previous = Some(o);
        }
        longest = longest.max(current);
    }
    longest
}

/// Decide whether the session should end now.
pub fn should_stop(input: StopInput<'_>, config: &AdaptiveConfig) -> StopDecision {
    let answered = input.questions_answered;

    if answered < config.min_questions {
        return StopDecision::proceed();
    }
    if input.sem <= config.target_sem {
        return StopDecision::stop(StopReason::Precision);
    }
    if answered >= config.max_questions {
        return StopDecision::stop(StopReason::MaxQuestions);
    }

    let rules = &config.stopping;
    if !rules.detect_stability {
        return StopDecision::proceed();
    }

    let window = rules.streak_window;
    if window > 0 && input.responses.len() >= window {
        let recent = &input.responses[input.responses.len() - window..];
        if recent.iter().all(|&c| c == recent[0]) {
            return StopDecision::stop(StopReason::UniformResponses);
        }
        if longest_run(recent) >= rules.streak_length {
            return StopDecision::stop(StopReason::Streak);
        }
    }

    // the first history entry is the starting theta, not an update
    let updates = input.theta_history.get(1..).unwrap_or_default();
    let window = rules.stability_window;
    if window > 1 && updates.len() >= window {
        let recent = &updates[updates.len() - window..];
        if variance(recent) < rules.stability_variance {
            return StopDecision::stop(StopReason::Stability);
        }
    }

    StopDecision::proceed()
}
