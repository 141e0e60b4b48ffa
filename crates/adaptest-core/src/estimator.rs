//! Ability (theta) estimation.
//!
//! Newton-Raphson maximum likelihood over a phase-dependent window of the
//! response history, followed by exponential smoothing and a fixed chain of
//! safety rails. Numerical trouble never escapes as an error: a failed
//! Newton-Raphson run degrades to a likelihood grid search, and an
//! implausibly large jump is replaced by an EAP estimate.
//!
//! Phases, by number of answered questions `n`:
//!
//! | Phase      | Range                         | Responses used                       |
//! |------------|-------------------------------|--------------------------------------|
//! | Building   | `n <= transition_start`       | whole history                        |
//! | Transition | `n <= transition_end`         | blend of whole history and window    |
//! | Mature     | beyond                        | last `window_size` responses only    |

use serde::{Deserialize, Serialize};

use crate::config::EstimatorSettings;
use crate::irt::{probability_correct, MAX_DISCRIMINATION, MAX_GUESSING, MIN_DISCRIMINATION};
use crate::model::{IrtParams, ResponseEvent};

/// Probabilities are kept this far away from 0 and 1 inside logarithms.
const PROBABILITY_EPSILON: f64 = 1e-10;

/// One answered item, reduced to what the likelihood needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredResponse {
    pub correct: bool,
    pub irt: IrtParams,
}

impl From<&ResponseEvent> for ScoredResponse {
    fn from(event: &ResponseEvent) -> Self {
        Self {
            correct: event.correct,
            irt: event.irt,
        }
    }
}

/// Which window of history the estimate was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationPhase {
    Building,
    Transition,
    Mature,
}

impl EstimationPhase {
    pub fn for_count(answered: usize, settings: &EstimatorSettings) -> Self {
        if answered <= settings.transition_start {
            EstimationPhase::Building
        } else if answered <= settings.transition_end {
            EstimationPhase::Transition
        } else {
            EstimationPhase::Mature
        }
    }

    fn max_step(self, settings: &EstimatorSettings) -> f64 {
        match self {
            EstimationPhase::Building => settings.max_step_building,
            EstimationPhase::Transition => settings.max_step_transition,
            EstimationPhase::Mature => settings.max_step_mature,
        }
    }

    fn smoothing(self, settings: &EstimatorSettings) -> f64 {
        match self {
            EstimationPhase::Building => settings.smoothing_building,
            EstimationPhase::Transition => settings.smoothing_transition,
            EstimationPhase::Mature => settings.smoothing_mature,
        }
    }
}

/// Estimation method that produced the raw estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    NewtonRaphson,
    Eap,
    GridSearch,
}

/// A safety rail that changed the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyRail {
    /// The raw jump was implausible and replaced by EAP.
    LargeJumpFallback,
    /// Change clamped during the opening questions.
    EarlyProtection,
    /// Estimate pinned to the previous theta against the answer's direction.
    DirectionLock,
    /// Distance from the session's initial theta clamped.
    SessionDrift,
    /// Estimate clamped to the theta bounds.
    Bounds,
}

/// Structured report of one ability update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityUpdate {
    /// Theta before this answer.
    pub previous_theta: f64,
    /// Theta after this answer.
    pub theta: f64,
    /// Estimate before smoothing and safety rails.
    pub raw_estimate: f64,
    pub phase: EstimationPhase,
    /// Weight of the recent window (0 in Building, 1 in Mature).
    pub blend_factor: f64,
    pub method: EstimationMethod,
    pub iterations: usize,
    pub converged: bool,
    /// Smoothing factor applied to `raw_estimate - previous_theta`.
    pub smoothing_alpha: f64,
    /// Rails that fired, in the order they were applied.
    pub rails: Vec<SafetyRail>,
}

impl AbilityUpdate {
    pub fn change(&self) -> f64 {
        self.theta - self.previous_theta
    }
}

/// Everything the estimator needs for one update.
#[derive(Debug, Clone, Copy)]
pub struct EstimationInput<'a> {
    /// Theta before the newest answer.
    pub theta: f64,
    /// Theta the session started from.
    pub initial_theta: f64,
    /// All answers so far, oldest first, including the newest.
    pub responses: &'a [ScoredResponse],
}

// ---------------------------------------------------------------------------
// Likelihood
// ---------------------------------------------------------------------------

struct ClampedItem {
    a: f64,
    c: f64,
    p: f64,
}

fn evaluate(theta: f64, irt: &IrtParams) -> ClampedItem {
    let a = irt.discrimination.clamp(MIN_DISCRIMINATION, MAX_DISCRIMINATION);
    let c = irt.guessing.clamp(0.0, MAX_GUESSING);
    let p = probability_correct(theta, irt.difficulty, irt.discrimination, irt.guessing)
        .clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
    ClampedItem { a, c, p }
}

/// Log-likelihood of the responses at `theta`.
pub fn log_likelihood(theta: f64, responses: &[ScoredResponse]) -> f64 {
    responses
        .iter()
        .map(|r| {
            let ClampedItem { p, .. } = evaluate(theta, &r.irt);
            if r.correct {
                p.ln()
            } else {
                (1.0 - p).ln()
            }
        })
        .sum()
}

struct Derivatives {
    first: f64,
    second: f64,
    expected_information: f64,
}

/// Exact first and second derivatives of the 3PL log-likelihood.
fn derivatives(theta: f64, responses: &[ScoredResponse]) -> Derivatives {
    let mut d = Derivatives {
        first: 0.0,
        second: 0.0,
        expected_information: 0.0,
    };
    for r in responses {
        let ClampedItem { a, c, p } = evaluate(theta, &r.irt);
        let u = if r.correct { 1.0 } else { 0.0 };
        let slope = a * (p - c).max(0.0) * (1.0 - p) / (1.0 - c);

        d.first += a * (u - p) * (p - c) / (p * (1.0 - c));
        d.second += a / (1.0 - c) * slope * (u * c / (p * p) - 1.0);
        d.expected_information += slope * slope / (p * (1.0 - p));
    }
    d
}

/// Result of a Newton-Raphson run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRaphsonOutcome {
    pub theta: f64,
    pub iterations: usize,
    pub converged: bool,
    /// Stopped because the second derivative vanished.
    pub degenerate: bool,
}

/// Newton-Raphson MLE starting from `start`.
///
/// Each step is clamped to `max_step`, the cumulative change to
/// `settings.max_total_change`, and theta to the configured bounds. Returns
/// `None` on arithmetic failure (non-finite derivatives or step).
pub fn newton_raphson(
    start: f64,
    responses: &[ScoredResponse],
    max_step: f64,
    settings: &EstimatorSettings,
) -> Option<NewtonRaphsonOutcome> {
    let start = settings.clamp_theta(start);
    let mut theta = start;
    let mut outcome = NewtonRaphsonOutcome {
        theta,
        iterations: 0,
        converged: false,
        degenerate: false,
    };

    for _ in 0..settings.max_iterations {
        outcome.iterations += 1;
        let d = derivatives(theta, responses);
        if !d.first.is_finite() || !d.second.is_finite() {
            return None;
        }

        // The observed curvature of the 3PL can turn positive for correct
        // answers far below the item; use Fisher scoring for that step.
        let curvature = if d.second < 0.0 {
            d.second
        } else {
            -d.expected_information
        };
        if curvature.abs() < settings.min_second_derivative {
            outcome.degenerate = true;
            break;
        }

        let delta = -d.first / curvature;
        if !delta.is_finite() {
            return None;
        }
        if delta.abs() < settings.convergence_tolerance {
            outcome.converged = true;
            break;
        }

        let delta = delta.clamp(-max_step, max_step);
        let total = (theta + delta - start)
            .clamp(-settings.max_total_change, settings.max_total_change);
        let next = settings.clamp_theta(start + total);
        let moved = next - theta;
        theta = next;

        // pinned against the change ceiling or a theta bound
        if moved.abs() < settings.convergence_tolerance {
            break;
        }
    }

    outcome.theta = theta;
    Some(outcome)
}

/// Expected-a-posteriori estimate with a normal prior centred at `prior_mean`.
///
/// Returns `None` if the posterior cannot be normalised.
pub fn eap_estimate(
    responses: &[ScoredResponse],
    prior_mean: f64,
    settings: &EstimatorSettings,
) -> Option<f64> {
    let n = settings.eap_grid_points.max(2);
    let step = (settings.theta_max - settings.theta_min) / (n - 1) as f64;
    let sd = settings.eap_prior_sd;

    let nodes: Vec<f64> = (0..n).map(|i| settings.theta_min + step * i as f64).collect();
    let log_post: Vec<f64> = nodes
        .iter()
        .map(|&t| {
            let z = (t - prior_mean) / sd;
            log_likelihood(t, responses) - 0.5 * z * z
        })
        .collect();

    let max = log_post.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return None;
    }
    let weights: Vec<f64> = log_post.iter().map(|lp| (lp - max).exp()).collect();
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return None;
    }

    let mean = nodes.iter().zip(&weights).map(|(t, w)| t * w).sum::<f64>() / total;
    mean.is_finite().then(|| settings.clamp_theta(mean))
}

/// Brute-force maximum likelihood over a fixed grid. Ties go to the node nearest `anchor`.
pub fn grid_search_mle(
    responses: &[ScoredResponse],
    anchor: f64,
    settings: &EstimatorSettings,
) -> f64 {
    let steps =
        ((settings.theta_max - settings.theta_min) / settings.grid_search_step).round() as usize;
    let mut best = settings.clamp_theta(anchor);
    let mut best_ll = f64::NEG_INFINITY;

    for i in 0..=steps {
        let t = settings.clamp_theta(settings.theta_min + settings.grid_search_step * i as f64);
        let ll = log_likelihood(t, responses);
        if !ll.is_finite() {
            continue;
        }
        let better = ll > best_ll + 1e-12;
        let tie_closer =
            (ll - best_ll).abs() <= 1e-12 && (t - anchor).abs() < (best - anchor).abs();
        if better || tie_closer {
            best_ll = ll;
            best = t;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Update pipeline
// ---------------------------------------------------------------------------

struct RawEstimate {
    theta: f64,
    method: EstimationMethod,
    iterations: usize,
    converged: bool,
    blend: f64,
}

fn recent(responses: &[ScoredResponse], window: usize) -> &[ScoredResponse] {
    &responses[responses.len().saturating_sub(window)..]
}

fn newton_or_grid(
    start: f64,
    responses: &[ScoredResponse],
    max_step: f64,
    settings: &EstimatorSettings,
) -> RawEstimate {
    match newton_raphson(start, responses, max_step, settings) {
        Some(nr) if !nr.degenerate => RawEstimate {
            theta: nr.theta,
            method: EstimationMethod::NewtonRaphson,
            iterations: nr.iterations,
            converged: nr.converged,
            blend: 0.0,
        },
        Some(nr) => {
            let eap = eap_estimate(responses, start, settings);
            tracing::warn!(
                responses = responses.len(),
                iterations = nr.iterations,
                theta = nr.theta,
                eap = ?eap,
                "newton-raphson curvature vanished, falling back"
            );
            let (theta, method) = match eap {
                Some(theta) => (theta, EstimationMethod::Eap),
                None => (
                    grid_search_mle(responses, start, settings),
                    EstimationMethod::GridSearch,
                ),
            };
            RawEstimate {
                theta,
                method,
                iterations: nr.iterations,
                converged: false,
                blend: 0.0,
            }
        }
        None => {
            tracing::warn!(
                responses = responses.len(),
                "newton-raphson failed, falling back to grid search"
            );
            RawEstimate {
                theta: grid_search_mle(responses, start, settings),
                method: EstimationMethod::GridSearch,
                iterations: 0,
                converged: false,
                blend: 0.0,
            }
        }
    }
}

fn raw_estimate(
    start: f64,
    responses: &[ScoredResponse],
    phase: EstimationPhase,
    settings: &EstimatorSettings,
) -> RawEstimate {
    let max_step = phase.max_step(settings);
    match phase {
        EstimationPhase::Building => newton_or_grid(start, responses, max_step, settings),
        EstimationPhase::Mature => {
            let mut raw = newton_or_grid(
                start,
                recent(responses, settings.window_size),
                max_step,
                settings,
            );
            raw.blend = 1.0;
            raw
        }
        EstimationPhase::Transition => {
            let n = responses.len() as f64;
            let start_n = settings.transition_start as f64;
            let end_n = settings.transition_end as f64;
            let blend = ((n - start_n) / (end_n - start_n)).clamp(0.0, 1.0);

            let cumulative = newton_or_grid(start, responses, max_step, settings);
            let windowed = newton_or_grid(
                start,
                recent(responses, settings.window_size),
                max_step,
                settings,
            );
            // report whichever fallback fired
            let method = if cumulative.method != EstimationMethod::NewtonRaphson {
                cumulative.method
            } else {
                windowed.method
            };
            RawEstimate {
                theta: (1.0 - blend) * cumulative.theta + blend * windowed.theta,
                method,
                iterations: cumulative.iterations.max(windowed.iterations),
                converged: cumulative.converged && windowed.converged,
                blend,
            }
        }
    }
}

/// Update theta after the newest response in `input.responses`.
///
/// With no responses the previous theta is returned unchanged.
pub fn estimate_ability(input: EstimationInput<'_>, settings: &EstimatorSettings) -> AbilityUpdate {
    let previous = settings.clamp_theta(input.theta);
    let answered = input.responses.len();
    let phase = EstimationPhase::for_count(answered, settings);

    let Some(latest) = input.responses.last() else {
        return AbilityUpdate {
            previous_theta: previous,
            theta: previous,
            raw_estimate: previous,
            phase,
            blend_factor: 0.0,
            method: EstimationMethod::NewtonRaphson,
            iterations: 0,
            converged: true,
            smoothing_alpha: 0.0,
            rails: Vec::new(),
        };
    };

    let mut rails = Vec::new();
    let mut raw = raw_estimate(previous, input.responses, phase, settings);

    if !raw.theta.is_finite() || (raw.theta - previous).abs() > settings.large_jump_threshold {
        let substitute = eap_estimate(input.responses, previous, settings);
        tracing::warn!(
            previous,
            raw = raw.theta,
            eap = ?substitute,
            "implausible ability jump, substituting EAP estimate"
        );
        rails.push(SafetyRail::LargeJumpFallback);
        match substitute {
            Some(theta) => {
                raw.theta = theta;
                raw.method = EstimationMethod::Eap;
            }
            None => {
                raw.theta = grid_search_mle(input.responses, previous, settings);
                raw.method = EstimationMethod::GridSearch;
            }
        }
        raw.converged = false;
    }

    let early = answered <= settings.early_protection_questions;
    let mut alpha = if early {
        settings.smoothing_early
    } else {
        phase.smoothing(settings)
    };
    if raw.converged {
        alpha *= settings.converged_damping;
    }
    let mut theta = previous + alpha * (raw.theta - previous);

    // (a) early-question protection
    if early {
        let limit = settings.early_protection_max_change;
        let clamped = theta.clamp(previous - limit, previous + limit);
        if clamped != theta {
            rails.push(SafetyRail::EarlyProtection);
            theta = clamped;
        }
    }

    // (b) response-direction lock
    if (!latest.correct && theta > previous) || (latest.correct && theta < previous) {
        rails.push(SafetyRail::DirectionLock);
        theta = previous;
    }

    // (c) drift from the session start; the interval always contains `previous`
    let drift = settings.max_session_drift;
    let lo = (input.initial_theta - drift).min(previous);
    let hi = (input.initial_theta + drift).max(previous);
    let clamped = theta.clamp(lo, hi);
    if clamped != theta {
        rails.push(SafetyRail::SessionDrift);
        theta = clamped;
    }

    let bounded = settings.clamp_theta(theta);
    if bounded != theta {
        rails.push(SafetyRail::Bounds);
        theta = bounded;
    }
    if !theta.is_finite() {
        theta = previous;
    }

    tracing::debug!(
        answered,
        previous,
        theta,
        raw = raw.theta,
        ?phase,
        method = ?raw.method,
        ?rails,
        "ability updated"
    );

    AbilityUpdate {
        previous_theta: previous,
        theta,
        raw_estimate: raw.theta,
        phase,
        blend_factor: raw.blend,
        method: raw.method,
        iterations: raw.iterations,
        converged: raw.converged,
        smoothing_alpha: alpha,
        rails,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(correct: bool, b: f64) -> ScoredResponse {
        ScoredResponse {
            correct,
            irt: IrtParams {
                difficulty: b,
                discrimination: 1.2,
                guessing: 0.2,
            },
        }
    }

    fn mixed(n: usize) -> Vec<ScoredResponse> {
        (0..n)
            .map(|i| response(i % 3 != 0, (i % 5) as f64 * 0.4 - 0.8))
            .collect()
    }

    fn settings() -> EstimatorSettings {
        EstimatorSettings::default()
    }

    fn update(theta: f64, responses: &[ScoredResponse]) -> AbilityUpdate {
        estimate_ability(
            EstimationInput {
                theta,
                initial_theta: 0.0,
                responses,
            },
            &settings(),
        )
    }

    #[test]
    fn phase_boundaries() {
        let s = settings();
        assert_eq!(EstimationPhase::for_count(1, &s), EstimationPhase::Building);
        assert_eq!(EstimationPhase::for_count(10, &s), EstimationPhase::Building);
        assert_eq!(EstimationPhase::for_count(11, &s), EstimationPhase::Transition);
        assert_eq!(EstimationPhase::for_count(20, &s), EstimationPhase::Transition);
        assert_eq!(EstimationPhase::for_count(21, &s), EstimationPhase::Mature);
    }

    #[test]
    fn likelihood_prefers_ability_matching_responses() {
        let responses = vec![response(true, -1.0), response(true, 0.0), response(false, 1.0)];
        let near = log_likelihood(0.3, &responses);
        let far = log_likelihood(-2.5, &responses);
        assert!(near > far);
    }

    #[test]
    fn newton_raphson_agrees_with_grid_search() {
        let mut s = settings();
        s.max_total_change = 6.0;
        s.max_iterations = 50;
        s.convergence_tolerance = 1e-6;
        let responses = mixed(30);

        let nr = newton_raphson(0.0, &responses, 0.5, &s).unwrap();
        let grid = grid_search_mle(&responses, 0.0, &s);
        assert!(nr.converged);
        assert!(
            (nr.theta - grid).abs() < 0.06,
            "newton-raphson {} vs grid {}",
            nr.theta,
            grid
        );
    }

    #[test]
    fn newton_raphson_respects_total_change() {
        let s = settings();
        let responses: Vec<_> = (0..20).map(|_| response(true, 2.5)).collect();
        let nr = newton_raphson(-1.0, &responses, 0.5, &s).unwrap();
        assert!(nr.theta <= -1.0 + s.max_total_change + 1e-12);
    }

    #[test]
    fn degenerate_curvature_stops_early() {
        let s = settings();
        let far_away = vec![ScoredResponse {
            correct: true,
            irt: IrtParams {
                difficulty: -1000.0,
                discrimination: 1.0,
                guessing: 0.0,
            },
        }];
        let nr = newton_raphson(0.5, &far_away, 0.5, &s).unwrap();
        assert!(nr.degenerate);
        assert_eq!(nr.theta, 0.5);
    }

    #[test]
    fn degenerate_curvature_falls_back_from_newton_raphson() {
        let unreachable: Vec<_> = (0..6)
            .map(|i| ScoredResponse {
                correct: i % 2 == 0,
                irt: IrtParams {
                    difficulty: 1000.0,
                    discrimination: 1.0,
                    guessing: 0.0,
                },
            })
            .collect();
        let result = update(0.5, &unreachable);
        assert_ne!(result.method, EstimationMethod::NewtonRaphson);
        assert!(!result.converged);
        assert!(result.theta.is_finite());
        assert!(result.theta >= settings().theta_min && result.theta <= settings().theta_max);
    }

    #[test]
    fn eap_without_data_returns_prior_mean() {
        let eap = eap_estimate(&[], 0.0, &settings()).unwrap();
        assert!(eap.abs() < 1e-6, "got {eap}");
    }

    #[test]
    fn eap_moves_toward_evidence() {
        let responses: Vec<_> = (0..6).map(|_| response(true, 1.0)).collect();
        let eap = eap_estimate(&responses, 0.0, &settings()).unwrap();
        assert!(eap > 0.0);
    }

    #[test]
    fn no_responses_keeps_theta() {
        let u = update(0.4, &[]);
        assert_eq!(u.theta, 0.4);
        assert!(u.rails.is_empty());
    }

    #[test]
    fn first_correct_answer_moves_up_a_little() {
        let u = update(0.0, &[response(true, 0.0)]);
        assert!(u.theta >= 0.0);
        assert!(u.theta <= settings().early_protection_max_change + 1e-12);
    }

    #[test]
    fn incorrect_answer_never_raises_theta() {
        // Easy items answered right, then a hard one missed: the MLE may sit
        // above the current theta but the update must not.
        let mut responses: Vec<_> = (0..12).map(|_| response(true, 0.5)).collect();
        responses.push(response(false, 2.5));
        let u = update(-0.5, &responses);
        assert!(u.theta <= -0.5, "theta rose to {}", u.theta);
    }

    #[test]
    fn correct_answer_never_lowers_theta() {
        let mut responses: Vec<_> = (0..12).map(|_| response(false, -0.5)).collect();
        responses.push(response(true, -2.5));
        let u = update(0.5, &responses);
        assert!(u.theta >= 0.5, "theta fell to {}", u.theta);
        assert!(u.rails.contains(&SafetyRail::DirectionLock));
    }

    #[test]
    fn theta_stays_within_bounds() {
        let s = settings();
        let mut theta = 0.0;
        let mut responses = Vec::new();
        for _ in 0..60 {
            responses.push(response(true, 2.8));
            theta = update(theta, &responses).theta;
            assert!(theta <= s.theta_max && theta >= s.theta_min);
        }
        assert!(theta > 1.5, "sustained success should raise theta, got {theta}");
    }

    #[test]
    fn mature_phase_uses_recent_window() {
        let responses = mixed(25);
        let u = update(0.2, &responses);
        assert_eq!(u.phase, EstimationPhase::Mature);
        assert_eq!(u.blend_factor, 1.0);
    }

    #[test]
    fn transition_phase_blends() {
        let responses = mixed(15);
        let u = update(0.2, &responses);
        assert_eq!(u.phase, EstimationPhase::Transition);
        assert!((u.blend_factor - 0.5).abs() < 1e-12);
    }

    #[test]
    fn large_jump_is_replaced_by_eap() {
        let mut s = settings();
        s.max_total_change = 3.0;
        s.max_step_building = 3.0;
        s.large_jump_threshold = 0.5;
        s.early_protection_questions = 0;
        let responses: Vec<_> = (0..8).map(|_| response(true, 2.0)).collect();
        let u = estimate_ability(
            EstimationInput {
                theta: -1.0,
                initial_theta: -1.0,
                responses: &responses,
            },
            &s,
        );
        assert!(u.rails.contains(&SafetyRail::LargeJumpFallback));
        assert_eq!(u.method, EstimationMethod::Eap);
        assert!(u.theta >= -1.0);
    }

    #[test]
    fn session_drift_is_bounded() {
        let mut s = settings();
        s.max_session_drift = 0.3;
        let responses: Vec<_> = (0..9).map(|_| response(true, 2.0)).collect();
        let u = estimate_ability(
            EstimationInput {
                theta: 0.25,
                initial_theta: 0.0,
                responses: &responses,
            },
            &s,
        );
        assert!(u.theta <= 0.3 + 1e-12);
    }

    #[test]
    fn grid_search_breaks_ties_toward_anchor() {
        // No responses: every node ties, the anchor wins.
        let s = settings();
        let t = grid_search_mle(&[], 1.02, &s);
        assert!((t - 1.0).abs() < 1e-9, "got {t}");
    }
}
